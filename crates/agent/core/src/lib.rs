//! Plain data model shared by every layer of the agent.
//!
//! Nothing in this crate performs I/O or keeps state between ticks:
//! - [`snapshot`]: what the vision collaborator observed this tick
//! - [`command`]: discrete input intents handed to the input collaborator
//! - [`state`]: high-level behavior modes and priority levels
//! - [`config`]: tunable thresholds with fail-fast validation

pub mod command;
pub mod config;
pub mod snapshot;
pub mod state;

pub use command::{Command, Direction};
pub use config::{AgentConfig, ConfigError, EntityClass, LabelConfig};
pub use snapshot::{BoundingBox, Detection, PerceptionSnapshot, Point, SnapshotError};
pub use state::{BehaviorState, PriorityLevel};
