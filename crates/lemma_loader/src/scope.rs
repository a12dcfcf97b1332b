//! The accumulated state contributed by imported interfaces.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use lemma_cache::Interface;
use lemma_common::ModuleName;
use lemma_diagnostics::Diagnostic;

use crate::error::LoadError;

/// Everything merged from the interfaces imported so far.
///
/// Each module is merged at most once; merging it again is a no-op. A module
/// whose interface has changed is replaced by [`forget`](Self::forget)ting it
/// before merging the new interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportedScope {
    merged: BTreeSet<ModuleName>,
    contributions: Vec<Arc<Interface>>,
    /// Names exported by every merged module.
    pub names: BTreeSet<String>,
    /// External signature, keyed by qualified name.
    pub signature: BTreeMap<String, String>,
    /// Builtin bindings.
    pub builtins: BTreeMap<String, String>,
    /// Pattern synonyms.
    pub pattern_synonyms: BTreeMap<String, String>,
    /// Display forms, keyed by the name they rewrite.
    pub display_forms: BTreeMap<String, Vec<String>>,
    /// User-declared warnings attached to names.
    pub user_warnings: BTreeMap<String, String>,
    /// Definitions marked as partial.
    pub partial_definitions: BTreeSet<String>,
    /// Warnings carried by the merged interfaces.
    pub warnings: Vec<Diagnostic>,
}

impl ImportedScope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unions `interface` into the scope.
    ///
    /// Fails without changing the scope if the interface binds a builtin that
    /// is already bound to a different definition.
    pub fn merge(&mut self, interface: &Arc<Interface>) -> Result<(), LoadError> {
        if self.merged.contains(&interface.name) {
            return Ok(());
        }
        for (builtin, bound) in &interface.exports.builtins {
            if let Some(existing) = self.builtins.get(builtin) {
                if existing != bound {
                    return Err(LoadError::DuplicateBuiltinBinding {
                        builtin: builtin.clone(),
                        existing: existing.clone(),
                        conflicting: bound.clone(),
                        module: interface.name.clone(),
                    });
                }
            }
        }
        self.absorb(Arc::clone(interface));
        Ok(())
    }

    /// Removes everything `module` contributed, keeping the other modules.
    pub fn forget(&mut self, module: &ModuleName) {
        if !self.merged.contains(module) {
            return;
        }
        let remaining: Vec<Arc<Interface>> = self
            .contributions
            .iter()
            .filter(|interface| &interface.name != module)
            .cloned()
            .collect();
        *self = Self::default();
        for interface in remaining {
            self.absorb(interface);
        }
    }

    // Callers have already ruled out builtin conflicts.
    fn absorb(&mut self, interface: Arc<Interface>) {
        let exports = &interface.exports;
        self.names.extend(exports.scope.iter().cloned());
        self.signature.extend(exports.signature.clone());
        self.builtins.extend(exports.builtins.clone());
        self.pattern_synonyms.extend(exports.pattern_synonyms.clone());
        for (name, forms) in &exports.display_forms {
            let slot = self.display_forms.entry(name.clone()).or_default();
            for form in forms {
                if !slot.contains(form) {
                    slot.push(form.clone());
                }
            }
        }
        self.user_warnings.extend(exports.user_warnings.clone());
        self.partial_definitions
            .extend(exports.partial_definitions.iter().cloned());
        self.warnings.extend(interface.warnings.iter().cloned());
        self.merged.insert(interface.name.clone());
        self.contributions.push(interface);
    }

    /// Returns `true` if `module` was merged.
    pub fn contains_module(&self, module: &ModuleName) -> bool {
        self.merged.contains(module)
    }

    /// Returns the merged modules in name order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleName> {
        self.merged.iter()
    }
}
