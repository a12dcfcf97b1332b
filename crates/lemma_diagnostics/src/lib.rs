//! Warnings collected while loading modules.
//!
//! Errors abort a load and are reported as `LoadError`s; everything that
//! lets the load continue is a [`Diagnostic`] identified by a stable
//! [`DiagnosticCode`]. Diagnostics are serializable because the warnings of a
//! checked module travel inside its interface.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;

pub use code::DiagnosticCode;
pub use diagnostic::Diagnostic;
