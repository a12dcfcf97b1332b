//! Locating the source file of a module.

use std::path::{Path, PathBuf};

use lemma_common::ModuleName;
use lemma_config::{resolve_include_roots, SessionConfig};

use crate::error::LoadError;

/// File extension of module source files.
pub const SOURCE_EXT: &str = "lm";

/// Where a module's source lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundModule {
    /// The include root containing the source.
    pub root: PathBuf,
    /// The source file itself.
    pub source_path: PathBuf,
}

/// Maps module names to source files.
pub trait ModuleFinder {
    /// Locates `module`, failing if it is missing or ambiguous.
    fn find(&self, module: &ModuleName) -> Result<FoundModule, LoadError>;
}

/// Finds `A.B` as `<root>/A/B.lm` under a list of include roots.
#[derive(Debug, Clone)]
pub struct FsModuleFinder {
    roots: Vec<PathBuf>,
}

impl FsModuleFinder {
    /// Creates a finder over `roots`, searched in order.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Creates a finder over the include roots configured for `project_dir`.
    pub fn from_config(project_dir: &Path, config: &SessionConfig) -> Self {
        Self::new(resolve_include_roots(project_dir, config))
    }

    /// The include roots.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl ModuleFinder for FsModuleFinder {
    fn find(&self, module: &ModuleName) -> Result<FoundModule, LoadError> {
        let relative = module.to_relative_path(SOURCE_EXT);
        let mut hits: Vec<FoundModule> = self
            .roots
            .iter()
            .map(|root| FoundModule {
                root: root.clone(),
                source_path: root.join(&relative),
            })
            .filter(|found| found.source_path.is_file())
            .collect();

        match hits.len() {
            0 => Err(LoadError::ModuleNotFound {
                module: module.clone(),
                searched: self.roots.clone(),
            }),
            1 => Ok(hits.remove(0)),
            _ => Err(LoadError::AmbiguousModule {
                module: module.clone(),
                paths: hits.into_iter().map(|found| found.source_path).collect(),
            }),
        }
    }
}
