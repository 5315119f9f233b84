//! Worker tasks that back the runtime orchestration.
//!
//! The tree runner is the only worker: a single task that owns the tree and
//! the blackboard for the lifetime of the agent.

mod runner;
mod stats;

pub use runner::{TickReport, TreeRunner};
pub use stats::RunnerStats;
