//! Decision core for the survival-game agent.
//!
//! This crate wires together the decision engine, the agent's behavior tree,
//! and the fixed-rate tree runner behind a small runtime API. Consumers embed
//! [`Runtime`] (or drive a [`TreeRunner`] directly) and plug in a vision
//! [`SnapshotSource`] and an [`InputSink`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the collaborator traits, errors, and stop signalling
//! - [`ai`] holds the blackboard, decision engine, nodes, and subtrees
//! - [`workers`] keeps the tree runner internal to the crate
pub mod ai;
pub mod api;
pub mod runtime;

mod workers;

pub use ai::{
    AgentContext, BbKey, Blackboard, BlackboardError, BehaviorTree, Decision, DecisionEngine,
    DecisionReason, GatherGoal, KeyScope, NodeFault, NodeView, TargetFeedback, keys,
};
pub use api::{
    CollaboratorKind, CommandFailure, InputError, InputSink, NullSink, Result, RuntimeError,
    ScriptedSource, SnapshotPublisher, SnapshotSource, StopHandle, StopSignal,
    WatchSnapshotSource, snapshot_channel, stop_channel,
};
pub use runtime::{Runtime, RuntimeBuilder};
pub use workers::{RunnerStats, TickReport, TreeRunner};
