//! Core behavior trait.
//!
//! This module defines the [`Behavior`] trait, which is the fundamental
//! abstraction for all behavior tree nodes. The trait is generic over a
//! context type `C`, allowing nodes to read perception data and write to a
//! blackboard without the tree knowing what either looks like.

use crate::Status;

/// A behavior tree node that can be evaluated against a context.
///
/// Nodes take `&mut self` because composites remember which child was
/// running and multi-tick actions keep their own progress.
pub trait Behavior<C>: Send {
    /// Evaluate this behavior node against the given context.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Mutable reference to the context. Nodes read the current
    ///   observation from it and record their output (e.g., emitted commands).
    ///
    /// # Returns
    ///
    /// - `Status::Success` if the behavior succeeded
    /// - `Status::Failure` if the behavior failed
    /// - `Status::Running` if the behavior needs more ticks
    fn tick(&mut self, ctx: &mut C) -> Status;

    /// Drops any in-progress state so the next tick starts from scratch.
    ///
    /// Stateless nodes keep the default no-op.
    fn reset(&mut self) {}
}

/// Blanket implementation for boxed behaviors.
///
/// This allows `Box<dyn Behavior<C>>` to also implement `Behavior<C>`,
/// enabling dynamic dispatch and heterogeneous collections of nodes.
impl<C> Behavior<C> for Box<dyn Behavior<C>> {
    #[inline]
    fn tick(&mut self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }

    #[inline]
    fn reset(&mut self) {
        (**self).reset()
    }
}
