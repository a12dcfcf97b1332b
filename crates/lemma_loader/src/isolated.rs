//! Checking an imported module in a forked session.
//!
//! The fork starts from the importer's import stack and caches and from the
//! scope the importer has built so far. Its caches always flow back to the
//! parent, whether the build succeeded or not; everything else it
//! accumulated is discarded, so only the import's interface crosses back.

use lemma_config::SessionConfig;

use crate::checker::CheckMode;
use crate::error::LoadError;
use crate::import_stack::ImportStack;
use crate::resolver::Built;
use crate::scope::ImportedScope;
use crate::session::{ModuleTarget, Session, SessionCaches, Toolchain};

/// What a fork starts from.
#[derive(Debug)]
pub struct IsolatedInput {
    /// The module to check.
    pub target: ModuleTarget,
    /// The parent's import stack, for cycle detection across the fork.
    pub stack: ImportStack,
    /// The parent's caches, moved into the fork.
    pub caches: SessionCaches,
    /// The scope the importer has accumulated.
    pub scope: ImportedScope,
}

/// What a fork hands back.
#[derive(Debug)]
pub struct IsolatedOutput {
    /// The freshly built interface, or why the build failed.
    pub result: Result<Built, LoadError>,
    /// The caches, including everything the fork added to them.
    pub caches: SessionCaches,
}

/// Runs isolated builds for one configuration and toolchain.
#[derive(Clone, Copy)]
pub struct IsolatedBuildRunner<'a> {
    config: &'a SessionConfig,
    tools: &'a Toolchain,
}

impl<'a> IsolatedBuildRunner<'a> {
    /// Creates a runner.
    pub fn new(config: &'a SessionConfig, tools: &'a Toolchain) -> Self {
        Self { config, tools }
    }

    /// Checks `input.target` in a fork and returns its result with the caches.
    pub fn run(&self, input: IsolatedInput) -> IsolatedOutput {
        let IsolatedInput {
            target,
            stack,
            caches,
            scope,
        } = input;
        let mut fork = Session::fork(self.config, self.tools, stack, caches);
        let result = fork.build_module(&target, CheckMode::BATCH, scope);
        IsolatedOutput {
            result,
            caches: fork.into_caches(),
        }
    }
}
