//! Agent decision-making.
//!
//! Two layers run every tick:
//!
//! 1. **Decision engine**: picks the behavior state by priority and writes
//!    it, with its targets, to the blackboard
//! 2. **Behavior tree**: the subtree guarded by that state turns it into
//!    commands
//!
//! # Modules
//!
//! - `blackboard`: typed, scoped key/value store
//! - `context`: per-agent tick context handed to every node
//! - `decision` / `engine`: priority-based state selection
//! - `nodes`: condition and action leaves
//! - `subtrees`: the layered tree library and the survival tree

pub mod blackboard;
pub mod context;
pub mod decision;
pub mod engine;
pub mod nodes;
pub mod subtrees;

pub use blackboard::{BbKey, Blackboard, BlackboardError, KeyScope, NodeView, keys};
pub use context::{AgentContext, NodeFault};
pub use decision::{Decision, DecisionReason, GatherGoal, TargetFeedback};
pub use engine::DecisionEngine;
pub use subtrees::BehaviorTree;
