//! Decorator behavior nodes.
//!
//! Decorators wrap a single child behavior and modify its result or execution.
//! This module provides [`Inverter`] (NOT logic) and [`Contained`] (fault
//! isolation).

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::{Behavior, Status};

/// Inverts the result of its child behavior.
///
/// # Semantics
///
/// - If the child returns `Success`, the inverter returns `Failure`
/// - If the child returns `Failure`, the inverter returns `Success`
/// - `Running` passes through unchanged
///
/// This is analogous to a logical NOT (!) operation.
pub struct Inverter<C> {
    child: Box<dyn Behavior<C>>,
}

impl<C> Inverter<C> {
    /// Creates a new inverter that wraps the given child behavior.
    pub fn new(child: Box<dyn Behavior<C>>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for Inverter<C> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        self.child.tick(ctx).invert()
    }

    fn reset(&mut self) {
        self.child.reset();
    }
}

/// Receives faults caught by [`Contained`].
///
/// Implemented by the tick context so the owner of the tree can surface
/// faulty nodes without the fault halting the rest of the tick.
pub trait FaultLog {
    fn record_fault(&mut self, node: &'static str, message: String);
}

/// Turns a panic inside its child into `Failure` for the current tick.
///
/// # Semantics
///
/// - A child that returns normally is passed through unchanged
/// - A child that panics is reset, the fault is reported through
///   [`FaultLog::record_fault`], and `Failure` is returned
///
/// The surrounding composite then proceeds as it would for any failing child.
pub struct Contained<C> {
    name: &'static str,
    child: Box<dyn Behavior<C>>,
}

impl<C> Contained<C> {
    /// Wraps `child`, labelling reported faults with `name`.
    pub fn new(name: &'static str, child: Box<dyn Behavior<C>>) -> Self {
        Self { name, child }
    }
}

impl<C: FaultLog> Behavior<C> for Contained<C> {
    fn tick(&mut self, ctx: &mut C) -> Status {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.child.tick(&mut *ctx)));
        match outcome {
            Ok(status) => status,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(node = self.name, %message, "node panicked; treating as failure");
                // The child may have been left half-updated.
                let _ = panic::catch_unwind(AssertUnwindSafe(|| self.child.reset()));
                ctx.record_fault(self.name, message);
                Status::Failure
            }
        }
    }

    fn reset(&mut self) {
        self.child.reset();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
