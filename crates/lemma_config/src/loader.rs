//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::SessionConfig;
use std::path::Path;

/// Name of the configuration file looked up in the project directory.
pub const CONFIG_FILE: &str = "lemma.toml";

/// Upper bound accepted for `build.max-isolated-retries`.
const MAX_ISOLATED_RETRIES_LIMIT: u32 = 16;

/// Loads and validates a `lemma.toml` configuration from a project directory.
pub fn load_config(project_dir: &Path) -> Result<SessionConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
        path: config_path.clone(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a `lemma.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<SessionConfig, ConfigError> {
    let config: SessionConfig =
        toml::from_str(content).map_err(|e| ConfigError::Malformed(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are usable.
fn validate_config(config: &SessionConfig) -> Result<(), ConfigError> {
    if config.project.include.iter().any(|root| root.is_empty()) {
        return Err(ConfigError::Invalid {
            key: "project.include",
            reason: "contains an empty path".to_string(),
        });
    }
    if config.build.interface_dir.is_empty() {
        return Err(ConfigError::Invalid {
            key: "build.interface-dir",
            reason: "must not be empty".to_string(),
        });
    }
    if config.build.max_isolated_retries > MAX_ISOLATED_RETRIES_LIMIT {
        return Err(ConfigError::Invalid {
            key: "build.max-isolated-retries",
            reason: format!(
                "must be at most {MAX_ISOLATED_RETRIES_LIMIT}, got {}",
                config.build.max_isolated_retries
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[project]
name = "demo"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name, "demo");
        assert_eq!(config.build.interface_dir, "_build");
        assert!(config.build.write_interfaces);
        assert_eq!(config.build.max_isolated_retries, 3);
        assert!(config.checks.option_consistency);
        assert_eq!(config.primitives.modules, vec!["Lemma.Primitive"]);
        assert_eq!(config.options, crate::options::PragmaOptions::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
name = "demo"
include = ["src", "vendor/stdlib"]

[build]
interface-dir = ".lemma"
write-interfaces = false
max-isolated-retries = 5

[checks]
option-consistency = false

[primitives]
modules = ["Prim"]

[options]
safe = true
without-K = true
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.include, vec!["src", "vendor/stdlib"]);
        assert_eq!(config.build.interface_dir, ".lemma");
        assert!(!config.build.write_interfaces);
        assert_eq!(config.build.max_isolated_retries, 5);
        assert!(!config.checks.option_consistency);
        assert_eq!(config.primitives.modules, vec!["Prim"]);
        assert!(config.options.safe);
        assert!(config.options.without_k);
    }

    #[test]
    fn empty_include_entry_errors() {
        let toml = r#"
[project]
name = "demo"
include = ["src", ""]
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "project.include",
                ..
            }
        ));
    }

    #[test]
    fn empty_interface_dir_errors() {
        let toml = r#"
[project]
name = "demo"

[build]
interface-dir = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "build.interface-dir",
                ..
            }
        ));
    }

    #[test]
    fn excessive_retry_cap_errors() {
        let toml = r#"
[project]
name = "demo"

[build]
max-isolated-retries = 1000
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(err.to_string().contains("max-isolated-retries"));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn unknown_option_value_type_errors() {
        let toml = r#"
[project]
name = "demo"

[options]
safe = "yes"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn load_from_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[project]\nname = \"on-disk\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.project.name, "on-disk");
    }

    #[test]
    fn missing_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        match err {
            ConfigError::Read { path, .. } => assert_eq!(path, dir.path().join(CONFIG_FILE)),
            other => panic!("expected a read error, got {other:?}"),
        }
    }
}
