//! Error types for module loading.

use std::path::PathBuf;

use lemma_cache::CacheError;
use lemma_common::ModuleName;

use crate::import_stack::ImportCycle;

/// Errors that abort the loading of a module.
///
/// Every failure to read or decode a stored interface is absorbed into a
/// recheck and never surfaces here; these are the failures no recheck can fix.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A module transitively imports itself.
    #[error(transparent)]
    ImportCycle(#[from] ImportCycle),

    /// No include root contains a source file for the module.
    #[error("module {module} not found in any of {} include root(s)", searched.len())]
    ModuleNotFound {
        /// The module that was looked up.
        module: ModuleName,
        /// The include roots that were searched.
        searched: Vec<PathBuf>,
    },

    /// More than one include root contains a source file for the module.
    #[error("module {module} is defined in more than one include root: {}", render_paths(paths))]
    AmbiguousModule {
        /// The module that was looked up.
        module: ModuleName,
        /// Every source file that matched.
        paths: Vec<PathBuf>,
    },

    /// A source file declares a different module than its path implies.
    #[error("{} should define module {expected} but defines {found}", path.display())]
    ModuleNameMismatch {
        /// The module implied by the file's location.
        expected: ModuleName,
        /// The module the file declares.
        found: ModuleName,
        /// The offending source file.
        path: PathBuf,
    },

    /// Two imported modules bind the same builtin to different definitions.
    #[error("builtin {builtin} is already bound to {existing}; {module} binds it to {conflicting}")]
    DuplicateBuiltinBinding {
        /// The builtin name.
        builtin: String,
        /// The definition it is already bound to.
        existing: String,
        /// The conflicting definition.
        conflicting: String,
        /// The module introducing the conflicting binding.
        module: ModuleName,
    },

    /// An imported module was checked with warnings and is not a primitive.
    #[error("module {module} was checked with warnings and cannot be imported")]
    ImportedWithWarnings {
        /// The module that cannot be imported.
        module: ModuleName,
    },

    /// The type checker rejected a module.
    #[error("failed to check {module}: {message}")]
    TypeCheck {
        /// The module being checked.
        module: ModuleName,
        /// The checker's message.
        message: String,
    },

    /// Every isolated rebuild of an import failed to re-validate.
    #[error("interface of {module} did not validate after {attempts} isolated build(s)")]
    IsolatedRebuildDiverged {
        /// The module whose rebuild never settled.
        module: ModuleName,
        /// How many builds were attempted.
        attempts: u32,
    },

    /// A source file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Source {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A freshly checked interface could not be encoded or persisted.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl LoadError {
    /// Returns the module the error is about, when there is a single one.
    pub fn module(&self) -> Option<&ModuleName> {
        match self {
            LoadError::ImportCycle(cycle) => cycle.chain.first(),
            LoadError::ModuleNotFound { module, .. }
            | LoadError::AmbiguousModule { module, .. }
            | LoadError::DuplicateBuiltinBinding { module, .. }
            | LoadError::ImportedWithWarnings { module }
            | LoadError::TypeCheck { module, .. }
            | LoadError::IsolatedRebuildDiverged { module, .. } => Some(module),
            LoadError::ModuleNameMismatch { expected, .. } => Some(expected),
            LoadError::Source { .. } | LoadError::Cache(_) => None,
        }
    }
}

fn render_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
