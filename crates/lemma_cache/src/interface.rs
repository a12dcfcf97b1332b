//! The compiled interface of a module.

use std::collections::{BTreeMap, BTreeSet};

use lemma_common::{ContentHash, ModuleName};
use lemma_config::PragmaOptions;
use lemma_diagnostics::Diagnostic;
use serde::{Deserialize, Serialize};

/// The externally visible artifacts of a checked module.
///
/// Their contents are opaque to the loader: it only stores them, hashes them,
/// and unions them into an importer's scope. Ordered maps keep the encoding,
/// and therefore the full hash, deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleExports {
    /// Names exported by the module.
    pub scope: BTreeSet<String>,
    /// Checked definitions, keyed by qualified name.
    pub signature: BTreeMap<String, String>,
    /// Builtin bindings, from builtin name to the bound definition.
    pub builtins: BTreeMap<String, String>,
    /// Pattern synonyms.
    pub pattern_synonyms: BTreeMap<String, String>,
    /// Display forms, keyed by the name they rewrite.
    pub display_forms: BTreeMap<String, Vec<String>>,
    /// User-declared warnings attached to names.
    pub user_warnings: BTreeMap<String, String>,
    /// Definitions marked as partial.
    pub partial_definitions: BTreeSet<String>,
}

/// The compiled, hashable, importable artifact for one module.
///
/// Produced once per successful check and immutable afterwards. The
/// `full_hash` covers the encoded interface including the recorded
/// import hashes, so any change in a dependency changes the hash of
/// everything built on top of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    /// The module this interface belongs to.
    pub name: ModuleName,
    /// Hash of the source text the interface was built from.
    pub source_hash: ContentHash,
    /// Hash of the whole interface; [`ContentHash::ZERO`] until sealed.
    pub full_hash: ContentHash,
    /// Direct imports with the full hash each had when this module was built.
    pub imports: Vec<(ModuleName, ContentHash)>,
    /// The options the module was checked with.
    pub options: PragmaOptions,
    /// Fingerprint of the session's base options at build time.
    pub base_options: ContentHash,
    /// Externally visible artifacts.
    pub exports: ModuleExports,
    /// Warnings produced while checking the module.
    pub warnings: Vec<Diagnostic>,
    /// Message reported to every importer of this module.
    pub import_warning: Option<String>,
}

impl Interface {
    /// Returns the recorded full hash of the direct import `module`.
    pub fn recorded_import_hash(&self, module: &ModuleName) -> Option<ContentHash> {
        self.imports
            .iter()
            .find(|(name, _)| name == module)
            .map(|(_, hash)| *hash)
    }

    /// Returns `true` if the module was checked with warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns `true` once [`HashLedger::seal`](crate::HashLedger::seal) has run.
    pub fn is_sealed(&self) -> bool {
        self.full_hash != ContentHash::ZERO
    }
}
