//! Canonical module identities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The canonical, dot-separated name of a module (e.g. `Data.List.Base`).
///
/// Unique within a session and compared structurally. Unlike interned
/// identifiers, a `ModuleName` is stable across sessions, so it can be
/// recorded inside persisted interfaces.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleName(String);

impl ModuleName {
    /// Creates a module name from its dotted textual form.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the dotted textual form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the dot-separated components.
    pub fn parts(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Returns `true` if this name equals `prefix` or lies underneath it.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0 == prefix
            || (self.0.len() > prefix.len()
                && self.0.starts_with(prefix)
                && self.0.as_bytes()[prefix.len()] == b'.')
    }

    /// Maps the name to a relative path with the given extension,
    /// e.g. `Data.List` with `lm` becomes `Data/List.lm`.
    pub fn to_relative_path(&self, ext: &str) -> PathBuf {
        let mut path: PathBuf = self.parts().collect();
        path.set_extension(ext);
        path
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleName({})", self.0)
    }
}
