//! The contract between the loader and the type checker.
//!
//! The loader never looks inside a module. It hands the source to a
//! [`TypeChecker`] together with a [`CheckContext`], through which the checker
//! resolves imports, adjusts the module's options from its pragmas, and
//! reports warnings. The checker returns the module's [`ModuleExports`]; the
//! loader turns those into a sealed [`Interface`].

use std::collections::BTreeSet;
use std::sync::Arc;

use lemma_cache::{Interface, ModuleExports};
use lemma_common::{ContentHash, ModuleName};
use lemma_config::PragmaOptions;
use lemma_diagnostics::Diagnostic;
use lemma_source::SourceFile;

use crate::diagnostics;
use crate::error::LoadError;
use crate::scope::ImportedScope;
use crate::session::Session;

/// How thoroughly a module is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// Resolve names only. The result is never persisted.
    ScopeCheckOnly,
    /// Full type checking.
    TypeCheck {
        /// Keep private declarations in the result. Such results are never
        /// persisted, and a stored interface is never reused for them.
        retain_private: bool,
    },
}

impl CheckMode {
    /// Full type checking of a module that is persisted when clean.
    pub const BATCH: CheckMode = CheckMode::TypeCheck {
        retain_private: false,
    };

    /// Returns `true` for [`CheckMode::ScopeCheckOnly`].
    pub fn is_scope_only(self) -> bool {
        matches!(self, CheckMode::ScopeCheckOnly)
    }

    /// Returns `true` if private declarations must be kept.
    pub fn retains_private(self) -> bool {
        matches!(self, CheckMode::TypeCheck { retain_private: true })
    }

    /// Returns `true` if a clean result may be written to disk and shared.
    pub fn persists(self) -> bool {
        self == Self::BATCH
    }
}

/// What the checker produces for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedModule {
    /// The module the source declares itself to be.
    pub name: ModuleName,
    /// The externally visible artifacts.
    pub exports: ModuleExports,
    /// A message to report to every importer of this module.
    pub import_warning: Option<String>,
}

/// Checks one module.
pub trait TypeChecker {
    /// Checks `source`, resolving imports through `ctx`.
    fn check(
        &self,
        ctx: &mut CheckContext<'_, '_>,
        source: &SourceFile,
        mode: CheckMode,
    ) -> Result<CheckedModule, LoadError>;
}

/// An import resolved for the module being checked.
#[derive(Debug, Clone)]
pub struct ResolvedImport {
    /// The imported module's interface.
    pub interface: Arc<Interface>,
}

impl ResolvedImport {
    /// The names the import brings into scope.
    pub fn scope(&self) -> &BTreeSet<String> {
        &self.interface.exports.scope
    }
}

/// The checker's view of the session while one module is checked.
pub struct CheckContext<'s, 'a> {
    session: &'s mut Session<'a>,
    module: ModuleName,
    options: PragmaOptions,
    scope: ImportedScope,
    imports: Vec<(ModuleName, ContentHash)>,
    warnings: Vec<Diagnostic>,
}

/// Everything a check accumulated besides the checker's own result.
pub(crate) struct CheckOutcome {
    pub(crate) options: PragmaOptions,
    pub(crate) scope: ImportedScope,
    pub(crate) imports: Vec<(ModuleName, ContentHash)>,
    pub(crate) warnings: Vec<Diagnostic>,
}

impl<'s, 'a> CheckContext<'s, 'a> {
    pub(crate) fn new(
        session: &'s mut Session<'a>,
        module: ModuleName,
        options: PragmaOptions,
        scope: ImportedScope,
    ) -> Self {
        Self {
            session,
            module,
            options,
            scope,
            imports: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// The module being checked.
    pub fn module(&self) -> &ModuleName {
        &self.module
    }

    /// The options the module is checked with so far.
    pub fn options(&self) -> &PragmaOptions {
        &self.options
    }

    /// Mutable access to the options, for applying the module's pragmas.
    ///
    /// Apply pragmas before resolving imports: each import is checked for
    /// compatibility against the options in effect when it is resolved.
    pub fn options_mut(&mut self) -> &mut PragmaOptions {
        &mut self.options
    }

    /// Everything merged from imports so far.
    pub fn scope(&self) -> &ImportedScope {
        &self.scope
    }

    /// Reports a warning for the module being checked.
    pub fn warn(&mut self, diagnostic: Diagnostic) {
        self.warnings.push(diagnostic);
    }

    /// Warnings reported so far.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Resolves `import`, merging its interface into the scope and recording
    /// its full hash as a dependency of the module being checked.
    ///
    /// Compatibility warnings and the import's own import warning are added
    /// to this module's warnings every time the import is resolved.
    pub fn resolve_import(&mut self, import: &ModuleName) -> Result<ResolvedImport, LoadError> {
        let (interface, compat) = self
            .session
            .resolve_import(import, &self.options, &self.scope)?;
        self.scope.merge(&interface)?;
        if !self.imports.iter().any(|(name, _)| name == import) {
            self.imports.push((import.clone(), interface.full_hash));
        }
        self.warnings.extend(compat);
        if let Some(message) = &interface.import_warning {
            self.warnings
                .push(diagnostics::import_warning(import, message));
        }
        Ok(ResolvedImport { interface })
    }

    pub(crate) fn finish(self) -> CheckOutcome {
        CheckOutcome {
            options: self.options,
            scope: self.scope,
            imports: self.imports,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_flags() {
        assert!(CheckMode::BATCH.persists());
        assert!(!CheckMode::BATCH.retains_private());
        assert!(CheckMode::ScopeCheckOnly.is_scope_only());
        assert!(!CheckMode::ScopeCheckOnly.persists());
        let interactive = CheckMode::TypeCheck {
            retain_private: true,
        };
        assert!(interactive.retains_private());
        assert!(!interactive.persists());
        assert!(!interactive.is_scope_only());
    }
}
