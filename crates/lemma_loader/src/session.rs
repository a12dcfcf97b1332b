//! A loading session and the state it owns.

use std::path::PathBuf;
use std::sync::Arc;

use lemma_cache::{ArtifactStore, BincodeCodec, Interface, InterfaceCodec};
use lemma_common::ModuleName;
use lemma_config::SessionConfig;
use lemma_diagnostics::Diagnostic;
use lemma_source::{SourceDb, SourceFile};

use crate::checker::TypeChecker;
use crate::compat::OptionsCompatibility;
use crate::decoded::DecodedModuleCache;
use crate::error::LoadError;
use crate::finder::ModuleFinder;
use crate::import_stack::ImportStack;
use crate::scope::ImportedScope;
use crate::visited::VisitedCache;

/// Version recorded in every interface artifact this loader writes.
pub const COMPILER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The pluggable parts of a session.
pub struct Toolchain {
    /// Maps module names to source files.
    pub finder: Box<dyn ModuleFinder>,
    /// Checks modules.
    pub checker: Box<dyn TypeChecker>,
    /// Encodes and decodes interfaces.
    pub codec: Box<dyn InterfaceCodec>,
}

impl Toolchain {
    /// Creates a toolchain using the [`BincodeCodec`].
    pub fn new(finder: impl ModuleFinder + 'static, checker: impl TypeChecker + 'static) -> Self {
        Self {
            finder: Box::new(finder),
            checker: Box::new(checker),
            codec: Box::new(BincodeCodec),
        }
    }

    /// Replaces the interface codec.
    pub fn with_codec(mut self, codec: impl InterfaceCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }
}

/// The caches threaded through isolated builds and handed back afterwards.
#[derive(Debug, Default)]
pub struct SessionCaches {
    /// Modules settled in this session.
    pub visited: VisitedCache,
    /// Interfaces decoded from or written to disk.
    pub decoded: DecodedModuleCache,
    /// Source files read so far.
    pub sources: SourceDb,
}

/// A module located on disk and ready to be validated or checked.
#[derive(Debug, Clone)]
pub struct ModuleTarget {
    /// The module.
    pub name: ModuleName,
    /// The include root holding the source.
    pub root: PathBuf,
    /// The source as last read.
    pub source: Arc<SourceFile>,
    /// Where the module's interface artifact lives.
    pub interface_path: PathBuf,
    /// Whether the module is a primitive module.
    pub primitive: bool,
}

/// The result of loading an entry module.
#[derive(Debug, Clone)]
pub struct LoadedModule {
    /// The module's interface.
    pub interface: Arc<Interface>,
    /// Warnings reported while checking it; empty when a stored interface
    /// was reused.
    pub warnings: Vec<Diagnostic>,
}

/// One loading session.
///
/// Owns the per-session caches and the state merged from every loaded
/// module. Loading the same module twice in one session yields the same
/// interface.
pub struct Session<'a> {
    pub(crate) config: &'a SessionConfig,
    pub(crate) tools: &'a Toolchain,
    pub(crate) store: ArtifactStore,
    pub(crate) compat: OptionsCompatibility,
    pub(crate) stack: ImportStack,
    pub(crate) caches: SessionCaches,
    pub(crate) state: ImportedScope,
}

impl<'a> Session<'a> {
    /// Creates a session with empty caches.
    pub fn new(config: &'a SessionConfig, tools: &'a Toolchain) -> Self {
        Self::fork(config, tools, ImportStack::new(), SessionCaches::default())
    }

    /// Creates a session that starts from the decoded interfaces of an
    /// earlier session, as an interactive reload does.
    ///
    /// Each carried interface is still compared against the artifact on disk
    /// before it is reused.
    pub fn resume(
        config: &'a SessionConfig,
        tools: &'a Toolchain,
        decoded: DecodedModuleCache,
    ) -> Self {
        let caches = SessionCaches {
            decoded,
            ..SessionCaches::default()
        };
        Self::fork(config, tools, ImportStack::new(), caches)
    }

    /// Creates a session that continues from an existing import stack and caches.
    pub(crate) fn fork(
        config: &'a SessionConfig,
        tools: &'a Toolchain,
        stack: ImportStack,
        caches: SessionCaches,
    ) -> Self {
        Self {
            config,
            tools,
            store: ArtifactStore::new(&config.build.interface_dir, COMPILER_VERSION),
            compat: OptionsCompatibility::from_config(config),
            stack,
            caches,
            state: ImportedScope::new(),
        }
    }

    /// The session configuration.
    pub fn config(&self) -> &'a SessionConfig {
        self.config
    }

    /// Modules settled so far.
    pub fn visited(&self) -> &VisitedCache {
        &self.caches.visited
    }

    /// Interfaces decoded so far.
    pub fn decoded(&self) -> &DecodedModuleCache {
        &self.caches.decoded
    }

    /// Modules whose resolution is in progress.
    pub fn import_stack(&self) -> &ImportStack {
        &self.stack
    }

    /// Everything merged from loaded modules and their imports.
    pub fn state(&self) -> &ImportedScope {
        &self.state
    }

    /// Where the interface of `module` under `root` is stored.
    pub fn interface_path(&self, root: &std::path::Path, module: &ModuleName) -> PathBuf {
        self.store.interface_path(root, module)
    }

    pub(crate) fn take_caches(&mut self) -> SessionCaches {
        std::mem::take(&mut self.caches)
    }

    pub(crate) fn restore_caches(&mut self, caches: SessionCaches) {
        self.caches = caches;
    }

    pub(crate) fn into_caches(self) -> SessionCaches {
        self.caches
    }

    /// Ends the session, keeping the decoded interfaces for [`Session::resume`].
    pub fn into_decoded(self) -> DecodedModuleCache {
        self.caches.decoded
    }

    /// Runs `f` with `module` pushed on the import stack and pops it again
    /// however `f` returns.
    pub(crate) fn with_import_frame<T>(
        &mut self,
        module: &ModuleName,
        f: impl FnOnce(&mut Self) -> Result<T, LoadError>,
    ) -> Result<T, LoadError> {
        let frame = self.stack.push(module)?;
        let result = f(self);
        self.stack.pop(frame);
        result
    }

    /// Re-reads the source of `target` from disk, replacing the cached copy.
    pub(crate) fn reload_source(&mut self, target: &mut ModuleTarget) -> Result<(), LoadError> {
        target.source = self
            .caches
            .sources
            .reload(&target.source.path)
            .map_err(|source| LoadError::Source {
                path: target.source.path.clone(),
                source,
            })?;
        Ok(())
    }

    /// Finds the source of `module` and reads it through the session's source cache.
    pub(crate) fn locate(&mut self, module: &ModuleName) -> Result<ModuleTarget, LoadError> {
        let found = self.tools.finder.find(module)?;
        let source = self
            .caches
            .sources
            .load(&found.source_path)
            .map_err(|source| LoadError::Source {
                path: found.source_path.clone(),
                source,
            })?;
        Ok(ModuleTarget {
            name: module.clone(),
            interface_path: self.store.interface_path(&found.root, module),
            root: found.root,
            source,
            primitive: self.config.is_primitive(module),
        })
    }
}
