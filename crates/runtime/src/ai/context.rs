//! Tick context shared by every node of the agent's tree.
//!
//! The [`AgentContext`] serves as the "blackboard" owner for a running agent.
//! It provides:
//!
//! - Read access to the snapshot of the current tick (or the last one seen)
//! - The blackboard, read-only for nodes except through [`NodeView`]
//! - Command storage for action nodes
//! - A fault log for nodes that panicked

use agent_core::{BehaviorState, Command, Detection, PerceptionSnapshot};
use behavior_tree::FaultLog;
use serde::Serialize;

use super::blackboard::{Blackboard, NodeView, keys};
use super::decision::GatherGoal;

/// A node that panicked during a tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeFault {
    pub tick: u64,
    pub node: &'static str,
    pub message: String,
}

/// Context for one agent's tree, owned by the tree runner.
///
/// # Lifetime
///
/// The context lives as long as the runner. Per-tick data (commands, faults)
/// is cleared by [`AgentContext::begin_tick`]; the snapshot and the blackboard
/// persist across ticks.
#[derive(Debug, Default)]
pub struct AgentContext {
    tick: u64,
    snapshot: Option<PerceptionSnapshot>,
    fresh: bool,
    board: Blackboard,
    commands: Vec<Command>,
    faults: Vec<NodeFault>,
}

impl AgentContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new tick. A `None` snapshot keeps the previous one, marked
    /// stale.
    pub fn begin_tick(&mut self, tick: u64, snapshot: Option<PerceptionSnapshot>) {
        self.tick = tick;
        self.fresh = snapshot.is_some();
        if let Some(snapshot) = snapshot {
            self.snapshot = Some(snapshot);
        }
        self.commands.clear();
        self.faults.clear();
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// The snapshot this tick works from. `None` until the first snapshot.
    pub fn snapshot(&self) -> Option<&PerceptionSnapshot> {
        self.snapshot.as_ref()
    }

    /// False when the snapshot was carried over from an earlier tick.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.board
    }

    /// Node-scoped write access to the blackboard.
    pub fn node_view(&mut self) -> NodeView<'_> {
        self.board.node_view()
    }

    // ========================================================================
    // Blackboard shortcuts
    // ========================================================================

    pub fn state(&self) -> BehaviorState {
        self.board
            .get(keys::BEHAVIOR_STATE)
            .copied()
            .unwrap_or_default()
    }

    pub fn threat_target(&self) -> Option<&Detection> {
        self.board.get(keys::THREAT_TARGET)
    }

    pub fn resource_target(&self) -> Option<&Detection> {
        self.board.get(keys::RESOURCE_TARGET)
    }

    pub fn gather_goal(&self) -> GatherGoal {
        self.board.get(keys::GATHER_GOAL).copied().unwrap_or_default()
    }

    pub fn materials(&self) -> u32 {
        self.board.get(keys::MATERIALS).copied().unwrap_or(0)
    }

    // ========================================================================
    // Runner access
    // ========================================================================

    /// Snapshot and full blackboard handle, borrowed together for the engine.
    pub(crate) fn engine_view(&mut self) -> (Option<&PerceptionSnapshot>, &mut Blackboard) {
        (self.snapshot.as_ref(), &mut self.board)
    }

    pub(crate) fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.board
    }

    /// Appends commands committed by an action node.
    pub(crate) fn commit(&mut self, commands: Vec<Command>) {
        self.commands.extend(commands);
    }

    /// Commands committed so far this tick, in emission order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn faults(&self) -> &[NodeFault] {
        &self.faults
    }

    pub fn take_faults(&mut self) -> Vec<NodeFault> {
        std::mem::take(&mut self.faults)
    }
}

impl FaultLog for AgentContext {
    fn record_fault(&mut self, node: &'static str, message: String) {
        self.faults.push(NodeFault {
            tick: self.tick,
            node,
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_snapshot_keeps_previous_as_stale() {
        let mut ctx = AgentContext::new();
        ctx.begin_tick(1, None);
        assert!(ctx.snapshot().is_none());
        assert!(!ctx.is_fresh());

        ctx.begin_tick(2, Some(PerceptionSnapshot::new(200).with_health(80)));
        assert!(ctx.is_fresh());

        ctx.begin_tick(3, None);
        assert!(!ctx.is_fresh());
        assert_eq!(ctx.snapshot().map(|s| s.timestamp), Some(200));
    }

    #[test]
    fn begin_tick_clears_per_tick_output() {
        let mut ctx = AgentContext::new();
        ctx.begin_tick(1, None);
        ctx.commit(vec![Command::Fire]);
        ctx.record_fault("flee", "boom".into());

        ctx.begin_tick(2, None);
        assert!(ctx.commands().is_empty());
        assert!(ctx.faults().is_empty());
    }

    #[test]
    fn faults_carry_the_tick() {
        let mut ctx = AgentContext::new();
        ctx.begin_tick(9, None);
        ctx.record_fault("harvest", "index out of bounds".into());
        assert_eq!(ctx.take_faults()[0].tick, 9);
    }
}
