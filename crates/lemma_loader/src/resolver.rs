//! Deciding, per module, whether a stored interface is reused or rebuilt.
//!
//! Every resolution runs inside an [`ImportStack`](crate::ImportStack) frame
//! that is popped on every exit path. A stored interface is reused when its
//! source hash and base options fingerprint match and the current full hash
//! of every recorded import equals the recorded one. Imports are rebuilt in
//! an isolated fork; the entry module is rebuilt in place so its state
//! merges into the session.

use std::collections::HashSet;
use std::sync::Arc;

use lemma_cache::{HashLedger, Interface};
use lemma_common::{ContentHash, ModuleName};
use lemma_config::PragmaOptions;
use lemma_diagnostics::Diagnostic;
use tracing::{debug, info, warn};

use crate::checker::{CheckContext, CheckMode};
use crate::error::LoadError;
use crate::isolated::{IsolatedBuildRunner, IsolatedInput};
use crate::scope::ImportedScope;
use crate::session::{LoadedModule, ModuleTarget, Session};
use crate::staleness::{self, StalenessReason, Validity};
use crate::visited::VisitedEntry;

/// A freshly checked module.
#[derive(Debug)]
pub struct Built {
    /// The sealed interface; the decoded copy read back from disk when persisted.
    pub interface: Arc<Interface>,
    /// The scope after merging every import of the module.
    pub scope: ImportedScope,
    /// Whether the interface was written to disk.
    pub persisted: bool,
}

impl<'a> Session<'a> {
    /// Loads `module` as the entry module of a compilation.
    ///
    /// Reuses the module's interface when it is already settled in this
    /// session or when its stored interface validates; otherwise checks it
    /// with `mode`. Either way the module and its imports are merged into
    /// the session [`state`](Session::state), replacing whatever an earlier
    /// load of the same module contributed. Modes that never settle the
    /// module re-read its source first.
    pub fn load_entry_module(
        &mut self,
        module: &ModuleName,
        mode: CheckMode,
    ) -> Result<LoadedModule, LoadError> {
        let previous = self.state.clone();
        self.state.forget(module);
        let result =
            self.with_import_frame(module, |session| session.load_entry_framed(module, mode));
        if result.is_err() {
            self.state = previous;
        }
        result
    }

    fn load_entry_framed(
        &mut self,
        module: &ModuleName,
        mode: CheckMode,
    ) -> Result<LoadedModule, LoadError> {
        if !mode.retains_private() {
            if let Some(entry) = self.caches.visited.lookup(module) {
                debug!(target: "lemma::load", module = %module, "entry module already visited");
                let interface = Arc::clone(&entry.interface);
                self.merge_with_imports(&interface)?;
                return Ok(LoadedModule {
                    warnings: interface.warnings.clone(),
                    interface,
                });
            }
        }

        let mut target = self.locate(module)?;
        if !mode.persists() {
            self.reload_source(&mut target)?;
        }
        if !mode.retains_private() {
            let scope = self.state.clone();
            match self.validate_stored(&target, &scope)? {
                Validity::Valid(interface) => {
                    debug!(target: "lemma::load", module = %module, "reusing stored interface");
                    if mode.persists() {
                        self.caches.visited.record(
                            module.clone(),
                            VisitedEntry::new(Arc::clone(&interface), false, target.primitive),
                        );
                    }
                    self.merge_with_imports(&interface)?;
                    return Ok(LoadedModule {
                        interface,
                        warnings: Vec::new(),
                    });
                }
                Validity::Stale(reason) => {
                    info!(target: "lemma::load", module = %module, %reason, "checking entry module");
                }
            }
        } else {
            info!(target: "lemma::load", module = %module, "checking entry module with private declarations");
        }

        let built = self.build_module(&target, mode, self.state.clone())?;
        let interface = built.interface;
        if mode.persists() {
            self.caches.visited.record(
                module.clone(),
                VisitedEntry::new(Arc::clone(&interface), interface.has_warnings(), target.primitive),
            );
        }
        self.state = built.scope;
        self.state.merge(&interface)?;
        Ok(LoadedModule {
            warnings: interface.warnings.clone(),
            interface,
        })
    }

    /// Resolves an import of a module being checked with `importer` options.
    ///
    /// Returns the import's interface and the options-compatibility warnings
    /// for the importer.
    pub(crate) fn resolve_import(
        &mut self,
        module: &ModuleName,
        importer: &PragmaOptions,
        scope: &ImportedScope,
    ) -> Result<(Arc<Interface>, Vec<Diagnostic>), LoadError> {
        let entry =
            self.with_import_frame(module, |session| session.resolve_import_framed(module, scope))?;

        if !entry.importable() {
            return Err(LoadError::ImportedWithWarnings {
                module: module.clone(),
            });
        }
        let warnings = self
            .compat
            .check(importer, &entry.interface, entry.is_primitive);
        Ok((entry.interface, warnings))
    }

    fn resolve_import_framed(
        &mut self,
        module: &ModuleName,
        scope: &ImportedScope,
    ) -> Result<VisitedEntry, LoadError> {
        if let Some(entry) = self.caches.visited.lookup(module) {
            debug!(target: "lemma::load", module = %module, "import already visited");
            return Ok(entry.clone());
        }

        let target = self.locate(module)?;
        let primitive = target.primitive;
        let (interface, has_warnings) = match self.validate_stored(&target, scope)? {
            Validity::Valid(interface) => {
                debug!(target: "lemma::load", module = %module, "reusing stored interface");
                (interface, false)
            }
            Validity::Stale(reason) => {
                info!(target: "lemma::load", module = %module, %reason, "rechecking import");
                let interface = self.rebuild_isolated(target, scope)?;
                let has_warnings = interface.has_warnings();
                (interface, has_warnings)
            }
        };

        let entry = VisitedEntry::new(interface, has_warnings, primitive);
        self.caches.visited.record(module.clone(), entry.clone());
        Ok(entry)
    }

    /// Decides whether the stored interface of `target` may be reused.
    ///
    /// Unreadable or mismatching artifacts make the module stale; only
    /// failures that a recheck could not fix, such as an import cycle, are
    /// returned as errors.
    pub(crate) fn validate_stored(
        &mut self,
        target: &ModuleTarget,
        scope: &ImportedScope,
    ) -> Result<Validity, LoadError> {
        let on_disk = self
            .store
            .read_header(&target.interface_path)
            .map(|header| header.full_hash);
        let candidate = match self.caches.decoded.get_current(&target.name, on_disk) {
            Some(cached) => cached,
            None if !target.interface_path.exists() => {
                return Ok(Validity::Stale(StalenessReason::NoInterface));
            }
            None => match self
                .store
                .read_interface(&target.interface_path, self.tools.codec.as_ref())
            {
                Some(decoded) => Arc::new(decoded),
                None => return Ok(Validity::Stale(StalenessReason::Undecodable)),
            },
        };

        if let Some(reason) = staleness::check_local(
            &candidate,
            &target.name,
            target.source.hash,
            self.config.options.fingerprint(),
        ) {
            return Ok(Validity::Stale(reason));
        }

        let changed = staleness::check_imports(&candidate, |import| {
            let (current, _) = self.resolve_import(import, &candidate.options, scope)?;
            Ok::<ContentHash, LoadError>(current.full_hash)
        })?;
        if let Some(reason) = changed {
            return Ok(Validity::Stale(reason));
        }

        self.caches
            .decoded
            .set(target.name.clone(), Arc::clone(&candidate));
        Ok(Validity::Valid(candidate))
    }

    /// Checks `target` against `scope` and seals the result.
    ///
    /// Clean batch results are written to disk and the decoded copy is
    /// returned; results with warnings, scope-only results, and results that
    /// keep private declarations are returned without being persisted.
    pub(crate) fn build_module(
        &mut self,
        target: &ModuleTarget,
        mode: CheckMode,
        scope: ImportedScope,
    ) -> Result<Built, LoadError> {
        let tools = self.tools;
        let config = self.config;

        let mut ctx = CheckContext::new(self, target.name.clone(), config.options.clone(), scope);
        let checked = tools.checker.check(&mut ctx, &target.source, mode)?;
        let outcome = ctx.finish();

        if checked.name != target.name {
            return Err(LoadError::ModuleNameMismatch {
                expected: target.name.clone(),
                found: checked.name,
                path: target.source.path.clone(),
            });
        }

        let interface = HashLedger::seal(
            tools.codec.as_ref(),
            Interface {
                name: checked.name,
                source_hash: target.source.hash,
                full_hash: ContentHash::ZERO,
                imports: outcome.imports,
                options: outcome.options,
                base_options: config.options.fingerprint(),
                exports: checked.exports,
                warnings: outcome.warnings,
                import_warning: checked.import_warning,
            },
        )?;

        let persist = mode.persists() && !interface.has_warnings() && config.build.write_interfaces;
        if !persist {
            debug!(
                target: "lemma::load",
                module = %target.name,
                warnings = interface.warnings.len(),
                "keeping interface in memory only"
            );
            return Ok(Built {
                interface: Arc::new(interface),
                scope: outcome.scope,
                persisted: false,
            });
        }

        let durable =
            self.store
                .write_interface(&target.interface_path, &interface, tools.codec.as_ref())?;
        info!(
            target: "lemma::load",
            module = %target.name,
            full_hash = %durable.full_hash,
            "wrote interface"
        );
        let durable = Arc::new(durable);
        self.caches
            .decoded
            .set(target.name.clone(), Arc::clone(&durable));
        Ok(Built {
            interface: durable,
            scope: outcome.scope,
            persisted: true,
        })
    }

    /// Rebuilds an import in an isolated fork, then re-validates the result
    /// against the source as it is on disk now.
    ///
    /// Gives up with [`LoadError::IsolatedRebuildDiverged`] once
    /// `max-isolated-retries` retries have failed to validate.
    fn rebuild_isolated(
        &mut self,
        mut target: ModuleTarget,
        scope: &ImportedScope,
    ) -> Result<Arc<Interface>, LoadError> {
        let attempts = self.config.build.max_isolated_retries.saturating_add(1);
        let runner = IsolatedBuildRunner::new(self.config, self.tools);

        for attempt in 1..=attempts {
            debug!(target: "lemma::load", module = %target.name, attempt, "isolated build");
            let output = runner.run(IsolatedInput {
                target: target.clone(),
                stack: self.stack.clone(),
                caches: self.take_caches(),
                scope: scope.clone(),
            });
            self.restore_caches(output.caches);
            let built = output.result?;
            if !built.persisted {
                return Ok(built.interface);
            }

            self.reload_source(&mut target)?;
            match self.validate_stored(&target, scope)? {
                Validity::Valid(interface) => return Ok(interface),
                Validity::Stale(reason) => warn!(
                    target: "lemma::load",
                    module = %target.name,
                    attempt,
                    %reason,
                    "rebuilt interface did not validate"
                ),
            }
        }

        Err(LoadError::IsolatedRebuildDiverged {
            module: target.name,
            attempts,
        })
    }

    /// Merges `interface` and, first, everything it transitively imports
    /// that is settled in this session.
    fn merge_with_imports(&mut self, interface: &Arc<Interface>) -> Result<(), LoadError> {
        let mut pending: Vec<Arc<Interface>> = vec![Arc::clone(interface)];
        let mut order: Vec<Arc<Interface>> = Vec::new();
        let mut seen = HashSet::new();
        while let Some(next) = pending.pop() {
            if !seen.insert(next.name.clone()) || self.state.contains_module(&next.name) {
                continue;
            }
            for (import, _) in &next.imports {
                if let Some(entry) = self.caches.visited.lookup(import) {
                    pending.push(Arc::clone(&entry.interface));
                }
            }
            order.push(next);
        }
        for iface in order.iter().rev() {
            self.state.merge(iface)?;
        }
        Ok(())
    }
}
