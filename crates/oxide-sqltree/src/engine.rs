//! The fixpoint rewriting loop that drives grammar rules over a tree.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::ast::{Ast, NodeId};
use crate::error::{InvariantViolation, Result};
use crate::rules::default_mutators;

/// Default ceiling on the passes one rule may take over one branch.
pub const DEFAULT_MAX_PASSES: usize = 10_000;

/// A grammar rule.
///
/// The engine calls [`Mutator::mutate`] for every child of a branch. A rule
/// that recognizes its pattern starting at `offset` folds the matched span
/// into one node through [`Ast::replace`] on `parent`; otherwise it leaves
/// the tree untouched and returns `Ok(())`. Errors mean the SQL is invalid.
pub trait Mutator {
    /// Returns the rule name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Applies the rule to `node`, the child of `parent` at `offset`.
    fn mutate(&self, ast: &mut Ast, node: NodeId, offset: usize, parent: NodeId) -> Result<()>;
}

/// Applies an ordered list of rules to a tree until none changes it.
///
/// Each rule runs to its own fixpoint on a branch before the next one
/// starts. Any change restarts the rule's scan of the branch since offsets
/// are stale after a splice. Nested branches are resolved with the full
/// rule list as the scan reaches them, and skipped afterwards until their
/// hash differs from the one they settled with.
pub struct MutationEngine {
    mutators: Vec<Box<dyn Mutator>>,
    max_passes: usize,
}

impl MutationEngine {
    /// Creates an engine running `mutators` in the given order.
    #[must_use]
    pub fn new(mutators: Vec<Box<dyn Mutator>>) -> Self {
        Self {
            mutators,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// Sets the per-rule, per-branch pass ceiling.
    #[must_use]
    pub const fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Returns the pass ceiling.
    #[must_use]
    pub const fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Returns the rule names in the order they run.
    pub fn mutator_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.mutators.iter().map(|m| m.name())
    }

    /// Rewrites the whole tree to a fixpoint.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a rule, or
    /// [`InvariantViolation::PassLimitExceeded`] if a rule keeps changing a
    /// branch for more than the configured number of passes.
    pub fn run(&self, ast: &mut Ast) -> Result<()> {
        self.mutate_branch(ast, ast.root())
    }

    /// Rewrites one branch, and every branch below it, to a fixpoint.
    ///
    /// # Errors
    ///
    /// See [`MutationEngine::run`].
    pub fn mutate_branch(&self, ast: &mut Ast, branch: NodeId) -> Result<()> {
        self.settle(ast, branch, &mut HashMap::new())
    }

    /// Runs every rule on `branch` unless it is unchanged since it last
    /// settled. `settled` maps branches to their hash at fixpoint.
    fn settle(&self, ast: &mut Ast, branch: NodeId, settled: &mut HashMap<NodeId, u64>) -> Result<()> {
        if settled.get(&branch) == Some(&ast.hash(branch)) {
            return Ok(());
        }
        for mutator in &self.mutators {
            let mut passes = 0;
            loop {
                if passes == self.max_passes {
                    return Err(InvariantViolation::PassLimitExceeded {
                        mutator: mutator.name(),
                        passes,
                    }
                    .into());
                }
                passes += 1;
                if !self.pass(ast, branch, mutator.as_ref(), settled)? {
                    break;
                }
            }
            debug!(
                mutator = mutator.name(),
                passes,
                children = ast.len(branch),
                "Mutator reached fixpoint"
            );
        }
        settled.insert(branch, ast.hash(branch));
        Ok(())
    }

    /// Scans the children once. Returns true if the branch changed.
    fn pass(
        &self,
        ast: &mut Ast,
        branch: NodeId,
        mutator: &dyn Mutator,
        settled: &mut HashMap<NodeId, u64>,
    ) -> Result<bool> {
        let mut processed = HashSet::new();
        let mut offset = 0;
        while let Some(child) = ast.get(branch, offset) {
            if processed.insert(child) {
                let before = ast.hash(branch);
                mutator.mutate(ast, child, offset, branch)?;
                let dirty = ast.hash(branch) != before;

                if let Some(current) = ast.get(branch, offset) {
                    if ast.is_branch(current) {
                        self.settle(ast, current, settled)?;
                    }
                }
                if dirty {
                    return Ok(true);
                }
            }
            offset += 1;
        }
        Ok(false)
    }
}

impl Default for MutationEngine {
    /// An engine running the built-in grammar rules.
    fn default() -> Self {
        Self::new(default_mutators())
    }
}

impl core::fmt::Debug for MutationEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MutationEngine")
            .field("mutators", &self.mutator_names().collect::<Vec<_>>())
            .field("max_passes", &self.max_passes)
            .finish()
    }
}
