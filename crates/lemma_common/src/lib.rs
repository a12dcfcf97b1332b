//! Shared foundational types used across the Lemma front end.
//!
//! This crate provides content hashing for source text and interface artifacts,
//! and the canonical [`ModuleName`] identity used by every cache.

#![warn(missing_docs)]

pub mod hash;
pub mod name;

pub use hash::ContentHash;
pub use name::ModuleName;
