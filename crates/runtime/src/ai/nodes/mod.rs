//! Agent-specific behavior tree nodes.
//!
//! Nodes are divided into:
//!
//! - `conditions`: side-effect-free checks, wrapped in [`Check`]
//! - `actions`: nodes that emit commands, wrapped in [`Act`]
//!
//! The wrappers enforce the rules every leaf follows: a condition fails until
//! the first snapshot arrives, and an action's commands are only kept when it
//! reports `Success` or `Running`.

pub mod actions;
pub mod conditions;

pub use actions::*;
pub use conditions::*;

use agent_core::{Command, Detection, PerceptionSnapshot};
use behavior_tree::{Behavior, Status};

use super::blackboard::NodeView;
use super::context::AgentContext;

// ============================================================================
// Conditions
// ============================================================================

/// A predicate over the tick context.
///
/// Only shared access is given, so evaluating a condition any number of
/// times within a tick cannot change anything.
pub trait ConditionNode: Send {
    fn check(&self, ctx: &AgentContext, snapshot: &PerceptionSnapshot) -> bool;
}

/// Runs a [`ConditionNode`] as a tree leaf.
pub struct Check<T>(pub T);

impl<T: ConditionNode> Behavior<AgentContext> for Check<T> {
    fn tick(&mut self, ctx: &mut AgentContext) -> Status {
        match ctx.snapshot() {
            Some(snapshot) => Status::from(self.0.check(ctx, snapshot)),
            None => Status::Failure,
        }
    }
}

// ============================================================================
// Actions
// ============================================================================

/// A leaf that turns the current state into commands.
pub trait ActionNode: Send {
    fn run(&mut self, scope: &mut ActionScope<'_>) -> Status;

    /// Clears progress kept across ticks.
    fn reset(&mut self) {}
}

/// What an action sees while it runs: the context, read-only, plus a
/// pending-command buffer and node-scoped blackboard writes.
pub struct ActionScope<'a> {
    ctx: &'a mut AgentContext,
    pending: Vec<Command>,
}

impl<'a> ActionScope<'a> {
    pub fn new(ctx: &'a mut AgentContext) -> Self {
        Self {
            ctx,
            pending: Vec::new(),
        }
    }

    pub fn context(&self) -> &AgentContext {
        self.ctx
    }

    pub fn snapshot(&self) -> Option<&PerceptionSnapshot> {
        self.ctx.snapshot()
    }

    pub fn threat_target(&self) -> Option<&Detection> {
        self.ctx.threat_target()
    }

    pub fn resource_target(&self) -> Option<&Detection> {
        self.ctx.resource_target()
    }

    pub fn materials(&self) -> u32 {
        self.ctx.materials()
    }

    pub fn emit(&mut self, command: Command) {
        self.pending.push(command);
    }

    pub fn node_view(&mut self) -> NodeView<'_> {
        self.ctx.node_view()
    }

    fn into_pending(self) -> Vec<Command> {
        self.pending
    }
}

/// Runs an [`ActionNode`] as a tree leaf.
pub struct Act<A> {
    name: &'static str,
    action: A,
}

impl<A: ActionNode> Act<A> {
    pub fn new(name: &'static str, action: A) -> Self {
        Self { name, action }
    }
}

impl<A: ActionNode> Behavior<AgentContext> for Act<A> {
    fn tick(&mut self, ctx: &mut AgentContext) -> Status {
        let mut scope = ActionScope::new(ctx);
        let status = self.action.run(&mut scope);
        let pending = scope.into_pending();

        if status.is_failure() {
            if !pending.is_empty() {
                tracing::warn!(
                    node = self.name,
                    discarded = pending.len(),
                    "action failed; dropping its commands"
                );
            }
            return status;
        }

        ctx.commit(pending);
        status
    }

    fn reset(&mut self) {
        self.action.reset();
    }
}
