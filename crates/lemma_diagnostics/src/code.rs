//! Stable codes identifying kinds of warnings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a kind of warning, displayed as `W` followed by a zero-padded
/// three-digit number (`W301`).
///
/// Codes from 300 up are raised by the loader while resolving imports; lower
/// codes are left to the type checker for warnings about a module's own
/// declarations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode(u16);

impl DiagnosticCode {
    /// Creates the code `W<number>`.
    pub const fn new(number: u16) -> Self {
        Self(number)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{:03}", self.0)
    }
}
