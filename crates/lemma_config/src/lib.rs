//! Parsing and validation of `lemma.toml` session configuration.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`SessionConfig`], and defines the [`PragmaOptions`] every module is checked
//! under together with the infective/coinfective flag tables.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod options;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use options::{OptionFlag, PragmaOptions, COINFECTIVE, INFECTIVE};
pub use resolve::resolve_include_roots;
pub use types::*;
