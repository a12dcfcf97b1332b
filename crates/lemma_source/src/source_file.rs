//! A loaded source file together with its content hash.

use lemma_common::ContentHash;
use std::path::PathBuf;

/// A source file loaded into the compilation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// The filesystem path of this file (or a synthetic name for in-memory sources).
    pub path: PathBuf,
    /// The full text content of the file.
    pub text: String,
    /// Hash of the text, compared against the source hash of stored interfaces.
    pub hash: ContentHash,
}

impl SourceFile {
    /// Creates a new `SourceFile`, hashing its text.
    pub fn new(path: PathBuf, text: String) -> Self {
        let hash = ContentHash::from_text(&text);
        Self { path, text, hash }
    }
}
