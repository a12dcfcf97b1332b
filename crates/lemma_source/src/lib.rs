//! Source text loading and hashing for a compilation session.
//!
//! The [`SourceDb`] reads each module's source once per session and records its
//! [`ContentHash`](lemma_common::ContentHash), which the loader compares against
//! the source hash stored in an interface.

#![warn(missing_docs)]

pub mod source_db;
pub mod source_file;

pub use source_db::SourceDb;
pub use source_file::SourceFile;
