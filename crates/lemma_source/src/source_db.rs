//! Central database of all source files read in a compilation session.

use crate::source_file::SourceFile;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The source database, owning all loaded source text keyed by path.
///
/// A file is read and hashed at most once per session unless it is
/// explicitly [`reload`](Self::reload)ed.
#[derive(Debug, Default)]
pub struct SourceDb {
    files: HashMap<PathBuf, Arc<SourceFile>>,
}

impl SourceDb {
    /// Creates an empty source database.
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    /// Returns the file at `path`, reading it from disk on first use.
    pub fn load(&mut self, path: &Path) -> Result<Arc<SourceFile>, io::Error> {
        if let Some(file) = self.files.get(path) {
            return Ok(Arc::clone(file));
        }
        self.reload(path)
    }

    /// Reads the file at `path` from disk, replacing any cached copy.
    pub fn reload(&mut self, path: &Path) -> Result<Arc<SourceFile>, io::Error> {
        let text = std::fs::read_to_string(path)?;
        let file = Arc::new(SourceFile::new(path.to_path_buf(), text));
        self.files.insert(path.to_path_buf(), Arc::clone(&file));
        Ok(file)
    }

    /// Returns the number of files loaded so far.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no files have been loaded.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
