//! Error types for interface artifact operations.

use std::path::PathBuf;

/// Errors that can occur while persisting interfaces.
///
/// Reads are fail-safe and never produce a `CacheError`: a missing or damaged
/// artifact is reported as a cache miss instead. Only writes, which the
/// caller explicitly asked for, surface errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing an artifact.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// An artifact that was just written could not be decoded back.
    #[error("interface written to {path} does not decode")]
    RoundTrip {
        /// The artifact file path.
        path: PathBuf,
    },
}
