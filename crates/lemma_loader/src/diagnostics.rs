//! Diagnostic codes and helper functions for loader warnings.
//!
//! Warning codes `W300`--`W302` cover options-compatibility violations and
//! the warnings a module attaches to every import of itself.

use lemma_common::ModuleName;
use lemma_config::OptionFlag;
use lemma_diagnostics::{Diagnostic, DiagnosticCode};

/// An imported module enables an infective option the importer does not.
pub const W300: DiagnosticCode = DiagnosticCode::new(300);

/// The importer enables a coinfective option an imported module does not.
pub const W301: DiagnosticCode = DiagnosticCode::new(301);

/// An imported module declared a warning for its importers.
pub const W302: DiagnosticCode = DiagnosticCode::new(302);

/// Creates a W300 warning for an infective `flag` enabled in `imported`.
pub fn infective_import(flag: OptionFlag, imported: &ModuleName) -> Diagnostic {
    Diagnostic::warning(
        W300,
        format!("importing {imported}, which is checked with {flag}"),
    )
    .with_module(imported.clone())
    .with_note(format!(
        "{flag} is infective: every module importing {imported} must enable it too"
    ))
}

/// Creates a W301 warning for a coinfective `flag` that `imported` lacks.
pub fn coinfective_import(flag: OptionFlag, imported: &ModuleName) -> Diagnostic {
    Diagnostic::warning(
        W301,
        format!("importing {imported}, which is not checked with {flag}"),
    )
    .with_module(imported.clone())
    .with_note(format!(
        "{flag} is coinfective: every module it is used with may only import modules that enable it"
    ))
}

/// Creates a W302 warning carrying the message `imported` declared for its importers.
pub fn import_warning(imported: &ModuleName, message: &str) -> Diagnostic {
    Diagnostic::warning(W302, message.to_string()).with_module(imported.clone())
}
