//! Composite behavior nodes.
//!
//! Composite nodes control the execution flow of multiple child behaviors.
//! This module provides the fundamental building blocks for creating complex
//! decision trees: [`Sequence`] (AND logic), [`Selector`] (OR logic) and
//! [`Parallel`] (quorum logic).
//!
//! `Sequence` and `Selector` keep memory of a `Running` child: the next tick
//! resumes at that child instead of re-evaluating the earlier ones.

use crate::{Behavior, Status, TreeError};

type Children<C> = Vec<Box<dyn Behavior<C>>>;

fn reset_all<C>(children: &mut Children<C>) {
    for child in children.iter_mut() {
        child.reset();
    }
}

/// Executes child behaviors in sequence until one fails.
///
/// # Semantics
///
/// A `Sequence` node evaluates its children from left to right:
/// - If a child returns `Failure`, the sequence **stops immediately**, resets
///   its progress and returns `Failure`
/// - If a child returns `Running`, the sequence returns `Running` and resumes
///   at that child on the next tick
/// - If a child returns `Success`, the sequence **continues** to the next child
/// - If all children return `Success`, the sequence returns `Success`
///
/// This is analogous to a short-circuited logical AND (&&) operation.
pub struct Sequence<C> {
    name: &'static str,
    children: Children<C>,
    index: usize,
}

impl<C> Sequence<C> {
    /// Creates a new sequence with the given child behaviors.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyComposite`] if `children` is empty. A sequence
    /// with no children is meaningless and indicates a broken tree definition.
    pub fn new(name: &'static str, children: Children<C>) -> Result<Self, TreeError> {
        if children.is_empty() {
            return Err(TreeError::EmptyComposite {
                kind: "sequence",
                name,
            });
        }
        Ok(Self {
            name,
            children,
            index: 0,
        })
    }
}

impl<C> Behavior<C> for Sequence<C> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        while self.index < self.children.len() {
            match self.children[self.index].tick(ctx) {
                Status::Success => self.index += 1,
                Status::Running => return Status::Running,
                Status::Failure => {
                    tracing::trace!(sequence = self.name, child = self.index, "failed");
                    self.reset();
                    return Status::Failure;
                }
            }
        }
        self.reset();
        Status::Success
    }

    fn reset(&mut self) {
        self.index = 0;
        reset_all(&mut self.children);
    }
}

/// Executes child behaviors in sequence until one succeeds.
///
/// # Semantics
///
/// A `Selector` node evaluates its children from left to right:
/// - If a child returns `Success`, the selector **stops immediately** and returns `Success`
/// - If a child returns `Running`, the selector returns `Running` and resumes
///   at that child on the next tick
/// - If a child returns `Failure`, the selector **continues** to the next child
/// - If all children return `Failure`, the selector returns `Failure`
///
/// This is analogous to a short-circuited logical OR (||) operation.
pub struct Selector<C> {
    name: &'static str,
    children: Children<C>,
    index: usize,
}

impl<C> Selector<C> {
    /// Creates a new selector with the given child behaviors.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyComposite`] if `children` is empty.
    pub fn new(name: &'static str, children: Children<C>) -> Result<Self, TreeError> {
        if children.is_empty() {
            return Err(TreeError::EmptyComposite {
                kind: "selector",
                name,
            });
        }
        Ok(Self {
            name,
            children,
            index: 0,
        })
    }
}

impl<C> Behavior<C> for Selector<C> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        while self.index < self.children.len() {
            match self.children[self.index].tick(ctx) {
                Status::Failure => self.index += 1,
                Status::Running => return Status::Running,
                Status::Success => {
                    self.reset();
                    return Status::Success;
                }
            }
        }
        tracing::trace!(selector = self.name, "every child failed");
        self.reset();
        Status::Failure
    }

    fn reset(&mut self) {
        self.index = 0;
        reset_all(&mut self.children);
    }
}

/// Ticks every child on every tick and resolves by quorum.
///
/// # Semantics
///
/// With `T` children and a success threshold `N`:
/// - `Success` once at least `N` children succeeded in the current tick
/// - `Failure` once more than `T - N` children failed in the current tick
/// - `Running` otherwise
pub struct Parallel<C> {
    name: &'static str,
    children: Children<C>,
    threshold: usize,
}

impl<C> Parallel<C> {
    /// Creates a new parallel node requiring `threshold` successes.
    ///
    /// # Errors
    ///
    /// - [`TreeError::EmptyComposite`] if `children` is empty
    /// - [`TreeError::InvalidThreshold`] unless `1 <= threshold <= children.len()`
    pub fn new(
        name: &'static str,
        threshold: usize,
        children: Children<C>,
    ) -> Result<Self, TreeError> {
        if children.is_empty() {
            return Err(TreeError::EmptyComposite {
                kind: "parallel",
                name,
            });
        }
        if threshold == 0 || threshold > children.len() {
            return Err(TreeError::InvalidThreshold {
                name,
                threshold,
                children: children.len(),
            });
        }
        Ok(Self {
            name,
            children,
            threshold,
        })
    }

}

impl<C> Behavior<C> for Parallel<C> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        let mut successes = 0;
        let mut failures = 0;

        for child in self.children.iter_mut() {
            match child.tick(ctx) {
                Status::Success => successes += 1,
                Status::Failure => failures += 1,
                Status::Running => {}
            }
        }

        let total = self.children.len();
        let status = if successes >= self.threshold {
            Status::Success
        } else if failures > total - self.threshold {
            Status::Failure
        } else {
            Status::Running
        };

        if status.is_terminal() {
            tracing::trace!(parallel = self.name, successes, failures, ?status, "resolved");
            self.reset();
        }
        status
    }

    fn reset(&mut self) {
        reset_all(&mut self.children);
    }
}
