//! Per-session record of modules whose interface has been settled.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use lemma_cache::Interface;
use lemma_common::ModuleName;
use tracing::warn;

/// A module whose interface was settled earlier in the session.
#[derive(Debug, Clone)]
pub struct VisitedEntry {
    /// The interface, shared with every other lookup of the module.
    pub interface: Arc<Interface>,
    /// Whether the module was checked with warnings in this session.
    pub has_warnings: bool,
    /// Whether the module is a primitive module.
    pub is_primitive: bool,
}

impl VisitedEntry {
    /// Creates an entry.
    pub fn new(interface: Arc<Interface>, has_warnings: bool, is_primitive: bool) -> Self {
        Self {
            interface,
            has_warnings,
            is_primitive,
        }
    }

    /// Returns `true` if other modules may import this one.
    pub fn importable(&self) -> bool {
        !self.has_warnings || self.is_primitive
    }
}

/// Modules settled in the current session.
///
/// Entries are never replaced: once a module has an interface in a session,
/// every later lookup sees exactly that interface.
#[derive(Debug, Default)]
pub struct VisitedCache {
    entries: HashMap<ModuleName, VisitedEntry>,
}

impl VisitedCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks a module up.
    pub fn lookup(&self, module: &ModuleName) -> Option<&VisitedEntry> {
        self.entries.get(module)
    }

    /// Records a module. Returns `false`, keeping the existing entry, if the
    /// module was already recorded.
    pub fn record(&mut self, module: ModuleName, entry: VisitedEntry) -> bool {
        match self.entries.entry(module) {
            Entry::Occupied(existing) => {
                warn!(
                    target: "lemma::load",
                    module = %existing.key(),
                    "module already visited; keeping the first interface"
                );
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    /// Returns `true` if `module` was recorded.
    pub fn contains(&self, module: &ModuleName) -> bool {
        self.entries.contains_key(module)
    }

    /// Returns the number of recorded modules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
