//! Incremental module loading with interface caching.
//!
//! For every module reachable from an entry module's imports, the loader
//! decides whether a previously persisted [`Interface`](lemma_cache::Interface)
//! may be reused or whether the module must be checked again. The decision
//! combines three hash layers (source text, full interface hash, and the
//! recorded hashes of imports), a per-session [`VisitedCache`], a
//! [`DecodedModuleCache`] of interfaces already read from disk, cycle
//! detection through the [`ImportStack`], and an options-compatibility check.
//!
//! Imported modules that must be rechecked are built by the
//! [`IsolatedBuildRunner`] in a forked session, so only their interface flows
//! back to the importer.
//!
//! # Usage
//!
//! ```ignore
//! let tools = Toolchain::new(FsModuleFinder::from_config(project_dir, &config), checker);
//! let mut session = Session::new(&config, &tools);
//! let loaded = session.load_entry_module(&ModuleName::new("Main"), CheckMode::BATCH)?;
//! ```

#![warn(missing_docs)]

pub mod checker;
pub mod compat;
pub mod decoded;
pub mod diagnostics;
pub mod error;
pub mod finder;
pub mod import_stack;
pub mod isolated;
mod resolver;
pub mod scope;
pub mod session;
pub mod staleness;
pub mod visited;

pub use checker::{CheckContext, CheckMode, CheckedModule, ResolvedImport, TypeChecker};
pub use compat::OptionsCompatibility;
pub use decoded::DecodedModuleCache;
pub use error::LoadError;
pub use finder::{FoundModule, FsModuleFinder, ModuleFinder, SOURCE_EXT};
pub use import_stack::{ImportCycle, ImportFrame, ImportStack};
pub use isolated::{IsolatedBuildRunner, IsolatedInput, IsolatedOutput};
pub use resolver::Built;
pub use scope::ImportedScope;
pub use session::{LoadedModule, ModuleTarget, Session, SessionCaches, Toolchain, COMPILER_VERSION};
pub use staleness::{StalenessReason, Validity};
pub use visited::{VisitedCache, VisitedEntry};
