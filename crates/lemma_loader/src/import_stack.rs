//! The chain of modules currently being resolved, for cycle detection.

use lemma_common::ModuleName;

/// An import cycle, from the first occurrence of the repeated module back to
/// itself (e.g. `A -> B -> A`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("import cycle: {}", render_chain(.chain))]
pub struct ImportCycle {
    /// The modules forming the cycle; first and last are the same module.
    pub chain: Vec<ModuleName>,
}

impl ImportCycle {
    /// Returns `true` if `module` takes part in the cycle.
    pub fn involves(&self, module: &ModuleName) -> bool {
        self.chain.contains(module)
    }
}

fn render_chain(chain: &[ModuleName]) -> String {
    chain
        .iter()
        .map(ModuleName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Token returned by [`ImportStack::push`]; hand it back to
/// [`ImportStack::pop`] on every exit path of the resolution it guards.
#[must_use = "an import frame must be popped when its resolution ends"]
#[derive(Debug)]
pub struct ImportFrame {
    depth: usize,
}

/// Stack of modules whose resolution is in progress.
///
/// A module may appear at most once; pushing a module that is already on the
/// stack is an import cycle. The stack is cloned into isolated builds so that
/// cycles through a forked session are still detected.
#[derive(Debug, Clone, Default)]
pub struct ImportStack {
    frames: Vec<ModuleName>,
}

impl ImportStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Pushes `module`, failing with the cycle if it is already being resolved.
    pub fn push(&mut self, module: &ModuleName) -> Result<ImportFrame, ImportCycle> {
        if let Some(pos) = self.frames.iter().position(|m| m == module) {
            let mut chain = self.frames[pos..].to_vec();
            chain.push(module.clone());
            return Err(ImportCycle { chain });
        }
        self.frames.push(module.clone());
        Ok(ImportFrame {
            depth: self.frames.len(),
        })
    }

    /// Pops the frame returned by the matching [`push`](Self::push).
    ///
    /// Anything pushed above the frame and never popped is discarded too.
    pub fn pop(&mut self, frame: ImportFrame) {
        debug_assert_eq!(
            self.frames.len(),
            frame.depth,
            "import frames popped out of order"
        );
        self.frames.truncate(frame.depth - 1);
    }

    /// Returns `true` if `module` is being resolved.
    pub fn contains(&self, module: &ModuleName) -> bool {
        self.frames.contains(module)
    }

    /// Returns the innermost module being resolved.
    pub fn current(&self) -> Option<&ModuleName> {
        self.frames.last()
    }

    /// Returns the modules being resolved, outermost first.
    pub fn frames(&self) -> &[ModuleName] {
        &self.frames
    }

    /// Returns the number of modules being resolved.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if nothing is being resolved.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
