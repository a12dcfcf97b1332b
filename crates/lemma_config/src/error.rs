//! Why a `lemma.toml` could not be turned into a session configuration.

use std::path::PathBuf;

/// Failure to load a project's `lemma.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the expected tables.
    #[error("malformed lemma.toml: {0}")]
    Malformed(String),

    /// A key parsed but holds a value no session can run with.
    #[error("invalid `{key}` in lemma.toml: {reason}")]
    Invalid {
        /// Dotted key of the offending value, e.g. `build.interface-dir`.
        key: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}
