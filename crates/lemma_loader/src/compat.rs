//! Options-compatibility check between an importer and its imports.

use lemma_cache::Interface;
use lemma_config::{PragmaOptions, SessionConfig, COINFECTIVE, INFECTIVE};
use lemma_diagnostics::Diagnostic;

use crate::diagnostics;

/// Compares the options of an importing module against those an imported
/// module was checked with.
///
/// A coinfective flag enabled in the importer must be enabled in the import;
/// an infective flag enabled in the import must be enabled in the importer.
/// Each violation is a warning naming the flag and the imported module.
#[derive(Debug, Clone, Copy)]
pub struct OptionsCompatibility {
    enabled: bool,
}

impl OptionsCompatibility {
    /// Creates a check that is active when `enabled` is `true`.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Creates the check configured by `[checks] option-consistency`.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.checks.option_consistency)
    }

    /// Checks `importer` options against `imported`. Primitive modules are
    /// never checked.
    pub fn check(
        &self,
        importer: &PragmaOptions,
        imported: &Interface,
        is_primitive: bool,
    ) -> Vec<Diagnostic> {
        if !self.enabled || is_primitive {
            return Vec::new();
        }
        let mut warnings = Vec::new();
        for &flag in COINFECTIVE {
            if importer.get(flag) && !imported.options.get(flag) {
                warnings.push(diagnostics::coinfective_import(flag, &imported.name));
            }
        }
        for &flag in INFECTIVE {
            if imported.options.get(flag) && !importer.get(flag) {
                warnings.push(diagnostics::infective_import(flag, &imported.name));
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lemma_common::{ContentHash, ModuleName};
    use lemma_config::OptionFlag;

    fn imported(options: PragmaOptions) -> Interface {
        Interface {
            name: ModuleName::new("Lib"),
            source_hash: ContentHash::from_text("lib"),
            full_hash: ContentHash::from_text("full"),
            imports: Vec::new(),
            options,
            base_options: PragmaOptions::default().fingerprint(),
            exports: Default::default(),
            warnings: Vec::new(),
            import_warning: None,
        }
    }

    #[test]
    fn matching_options_are_silent() {
        let opts = PragmaOptions::default().with(OptionFlag::Safe).with(OptionFlag::Prop);
        let check = OptionsCompatibility::new(true);
        assert!(check.check(&opts, &imported(opts.clone()), false).is_empty());
    }

    #[test]
    fn coinfective_missing_in_import() {
        let importer = PragmaOptions::default().with(OptionFlag::Safe);
        let warnings =
            OptionsCompatibility::new(true).check(&importer, &imported(PragmaOptions::default()), false);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, diagnostics::W301);
        assert!(warnings[0].message.contains("--safe"));
        assert!(warnings[0].message.contains("Lib"));
    }

    #[test]
    fn coinfective_only_in_import_is_fine() {
        let lib = PragmaOptions::default().with(OptionFlag::WithoutK);
        let warnings =
            OptionsCompatibility::new(true).check(&PragmaOptions::default(), &imported(lib), false);
        assert!(warnings.is_empty());
    }

    #[test]
    fn infective_missing_in_importer() {
        let lib = PragmaOptions::default().with(OptionFlag::Rewriting);
        let warnings =
            OptionsCompatibility::new(true).check(&PragmaOptions::default(), &imported(lib), false);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, diagnostics::W300);
        assert!(warnings[0].message.contains("--rewriting"));
    }

    #[test]
    fn one_warning_per_flag() {
        let importer = PragmaOptions::default()
            .with(OptionFlag::Safe)
            .with(OptionFlag::NoSizedTypes);
        let lib = PragmaOptions::default().with(OptionFlag::Cubical);
        let warnings = OptionsCompatibility::new(true).check(&importer, &imported(lib), false);
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn neutral_flags_ignored() {
        let lib = PragmaOptions::default().with(OptionFlag::AllowUnsolvedMetas);
        let warnings =
            OptionsCompatibility::new(true).check(&PragmaOptions::default(), &imported(lib), false);
        assert!(warnings.is_empty());
    }

    #[test]
    fn primitives_and_disabled_check_skip() {
        let importer = PragmaOptions::default().with(OptionFlag::Safe);
        let lib = imported(PragmaOptions::default());
        assert!(OptionsCompatibility::new(true).check(&importer, &lib, true).is_empty());
        assert!(OptionsCompatibility::new(false).check(&importer, &lib, false).is_empty());
    }

    #[test]
    fn follows_config() {
        let mut config = SessionConfig::default();
        config.checks.option_consistency = false;
        let importer = PragmaOptions::default().with(OptionFlag::Safe);
        let lib = imported(PragmaOptions::default());
        assert!(OptionsCompatibility::from_config(&config).check(&importer, &lib, false).is_empty());
    }
}
