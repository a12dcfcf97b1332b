//! Interfaces already decoded from disk in this session.

use std::collections::HashMap;
use std::sync::Arc;

use lemma_cache::Interface;
use lemma_common::{ContentHash, ModuleName};
use tracing::debug;

/// Per-session map from module to the interface last decoded or written for it.
///
/// An entry is only trusted while the artifact on disk still carries the same
/// full hash; [`get_current`](Self::get_current) drops it otherwise.
#[derive(Debug, Default)]
pub struct DecodedModuleCache {
    entries: HashMap<ModuleName, Arc<Interface>>,
}

impl DecodedModuleCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached interface without checking it against disk.
    pub fn get(&self, module: &ModuleName) -> Option<Arc<Interface>> {
        self.entries.get(module).cloned()
    }

    /// Returns the cached interface if `on_disk` (the full hash in the
    /// artifact header, if one could be read) matches it; drops the entry
    /// and returns `None` otherwise.
    pub fn get_current(
        &mut self,
        module: &ModuleName,
        on_disk: Option<ContentHash>,
    ) -> Option<Arc<Interface>> {
        let cached = self.entries.get(module)?;
        if on_disk == Some(cached.full_hash) {
            return Some(Arc::clone(cached));
        }
        debug!(
            target: "lemma::load",
            module = %module,
            "decoded interface no longer matches the artifact on disk"
        );
        self.entries.remove(module);
        None
    }

    /// Stores an interface, replacing any previous entry.
    pub fn set(&mut self, module: ModuleName, interface: Arc<Interface>) {
        self.entries.insert(module, interface);
    }

    /// Removes the entry for `module`.
    pub fn drop(&mut self, module: &ModuleName) -> Option<Arc<Interface>> {
        self.entries.remove(module)
    }

    /// Returns the number of cached interfaces.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
