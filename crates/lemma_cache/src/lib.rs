//! Module interfaces and their on-disk artifacts.
//!
//! This crate defines the [`Interface`] a checked module produces, the codec
//! that serializes it, the [`HashLedger`] that computes source and full hashes,
//! and the [`ArtifactStore`] that persists interfaces behind a header which can
//! be read without decoding the body.

#![warn(missing_docs)]

pub mod artifact;
pub mod codec;
pub mod error;
pub mod hasher;
pub mod interface;

pub use artifact::{ArtifactHeader, ArtifactStore, INTERFACE_EXT};
pub use codec::{BincodeCodec, InterfaceCodec};
pub use error::CacheError;
pub use hasher::HashLedger;
pub use interface::{Interface, ModuleExports};
