//! Why a stored interface may or may not be reused.

use std::fmt;
use std::sync::Arc;

use lemma_cache::Interface;
use lemma_common::{ContentHash, ModuleName};

use crate::error::LoadError;

/// The reason a stored interface cannot be reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StalenessReason {
    /// There is no artifact on disk.
    NoInterface,
    /// The artifact exists but could not be read or decoded.
    Undecodable,
    /// The artifact belongs to a different module.
    NameMismatch {
        /// The module the artifact claims to be.
        found: ModuleName,
    },
    /// The source text changed since the interface was built.
    SourceChanged,
    /// The session's base options changed since the interface was built.
    OptionsChanged,
    /// An import's current full hash differs from the recorded one.
    ImportChanged {
        /// The changed import.
        module: ModuleName,
    },
}

impl fmt::Display for StalenessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StalenessReason::NoInterface => f.write_str("no stored interface"),
            StalenessReason::Undecodable => f.write_str("stored interface is unreadable"),
            StalenessReason::NameMismatch { found } => {
                write!(f, "stored interface belongs to {found}")
            }
            StalenessReason::SourceChanged => f.write_str("source changed"),
            StalenessReason::OptionsChanged => f.write_str("base options changed"),
            StalenessReason::ImportChanged { module } => write!(f, "import {module} changed"),
        }
    }
}

/// Outcome of validating a stored interface.
#[derive(Debug, Clone)]
pub enum Validity {
    /// The interface may be reused as is.
    Valid(Arc<Interface>),
    /// The module must be rechecked.
    Stale(StalenessReason),
}

/// Checks the parts of a candidate that do not depend on other modules:
/// its name, its source hash, and the base options fingerprint.
pub fn check_local(
    candidate: &Interface,
    expected: &ModuleName,
    source_hash: ContentHash,
    base_options: ContentHash,
) -> Option<StalenessReason> {
    if &candidate.name != expected {
        return Some(StalenessReason::NameMismatch {
            found: candidate.name.clone(),
        });
    }
    if candidate.source_hash != source_hash {
        return Some(StalenessReason::SourceChanged);
    }
    if candidate.base_options != base_options {
        return Some(StalenessReason::OptionsChanged);
    }
    None
}

/// Compares every recorded import hash with the import's current full hash,
/// as produced by `current`. Stops at the first mismatch.
pub fn check_imports<F>(candidate: &Interface, mut current: F) -> Result<Option<StalenessReason>, LoadError>
where
    F: FnMut(&ModuleName) -> Result<ContentHash, LoadError>,
{
    for (import, recorded) in &candidate.imports {
        if current(import)? != *recorded {
            return Ok(Some(StalenessReason::ImportChanged {
                module: import.clone(),
            }));
        }
    }
    Ok(None)
}
