//! Resolution of configured include roots against the project directory.

use crate::types::SessionConfig;
use std::path::{Path, PathBuf};

/// Resolves `project.include` entries to absolute search roots.
///
/// Relative entries are joined onto `project_dir`; absolute entries are kept.
/// Duplicate roots are removed, keeping the first occurrence, so that the
/// same directory listed twice is not reported as an overlapping root.
pub fn resolve_include_roots(project_dir: &Path, config: &SessionConfig) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::with_capacity(config.project.include.len());
    for entry in &config.project.include {
        let root = if entry == "." {
            project_dir.to_path_buf()
        } else {
            project_dir.join(entry)
        };
        if !roots.contains(&root) {
            roots.push(root);
        }
    }
    roots
}
