//! Configuration types deserialized from `lemma.toml`.

use crate::options::PragmaOptions;
use lemma_common::ModuleName;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level session configuration parsed from `lemma.toml`.
///
/// Every section except `[project]` is optional and falls back to its
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Project metadata and include roots.
    #[serde(default)]
    pub project: ProjectMeta,
    /// Interface persistence settings.
    #[serde(default)]
    pub build: BuildConfig,
    /// Session-wide consistency checks.
    #[serde(default)]
    pub checks: ChecksConfig,
    /// Built-in module configuration.
    #[serde(default)]
    pub primitives: PrimitivesConfig,
    /// Base pragma options applied to every module before its own pragmas.
    #[serde(default)]
    pub options: PragmaOptions,
}

impl SessionConfig {
    /// Returns `true` if `module` is a built-in module.
    ///
    /// Built-in modules are exempt from the options-compatibility check and
    /// from the ban on reusing modules that were checked with warnings.
    pub fn is_primitive(&self, module: &ModuleName) -> bool {
        self.primitives
            .modules
            .iter()
            .any(|prefix| module.has_prefix(prefix))
    }
}

/// Project metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    #[serde(default)]
    pub name: String,
    /// Directories searched for module sources, relative to the project directory.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(default = "default_include", deserialize_with = "deserialize_string_or_vec")]
    pub include: Vec<String>,
}

impl Default for ProjectMeta {
    fn default() -> Self {
        Self {
            name: String::new(),
            include: default_include(),
        }
    }
}

fn default_include() -> Vec<String> {
    vec![".".to_string()]
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows `include = "src"` as well as `include = ["src", "lib"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Interface persistence settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Directory, relative to each include root, holding interface artifacts.
    #[serde(default = "default_interface_dir")]
    pub interface_dir: String,
    /// Whether freshly checked interfaces are written to disk at all.
    #[serde(default = "default_true")]
    pub write_interfaces: bool,
    /// How many times an isolated rebuild may be retried when its result
    /// fails re-validation before the load is abandoned.
    #[serde(default = "default_max_isolated_retries")]
    pub max_isolated_retries: u32,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            interface_dir: default_interface_dir(),
            write_interfaces: true,
            max_isolated_retries: default_max_isolated_retries(),
        }
    }
}

fn default_interface_dir() -> String {
    "_build".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_isolated_retries() -> u32 {
    3
}

/// Session-wide consistency checks.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChecksConfig {
    /// Compare the options of every import against the importer's options.
    #[serde(default = "default_true")]
    pub option_consistency: bool,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            option_consistency: true,
        }
    }
}

/// Built-in module configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PrimitivesConfig {
    /// Module-name prefixes identifying built-in modules.
    #[serde(default = "default_primitive_modules")]
    pub modules: Vec<String>,
}

impl Default for PrimitivesConfig {
    fn default() -> Self {
        Self {
            modules: default_primitive_modules(),
        }
    }
}

fn default_primitive_modules() -> Vec<String> {
    vec!["Lemma.Primitive".to_string()]
}
