//! A warning attached to a module.

use crate::code::DiagnosticCode;
use lemma_common::ModuleName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A warning reported while checking a module or resolving its imports.
///
/// A module whose check produced any diagnostic is never persisted and may
/// not be imported, so there is no separate severity: every diagnostic here
/// is a warning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What kind of warning this is.
    pub code: DiagnosticCode,
    /// The main message.
    pub message: String,
    /// The module the warning is about, when it is not the one being checked.
    pub module: Option<ModuleName>,
    /// Follow-up lines explaining how to resolve the warning.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a warning with the given code and message.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            module: None,
            notes: Vec::new(),
        }
    }

    /// Names the module the warning is about.
    pub fn with_module(mut self, module: ModuleName) -> Self {
        self.module = Some(module);
        self
    }

    /// Adds a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning[{}]: {}", self.code, self.message)?;
        if let Some(module) = &self.module {
            write!(f, " (in {module})")?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}
