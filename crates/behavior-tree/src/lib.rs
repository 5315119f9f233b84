//! Lightweight behavior tree library for real-time agents.
//!
//! This library provides a small behavior tree implementation designed for
//! fixed-rate decision loops where actions may span several ticks.
//!
//! - **Running state**: Actions can report progress and resume next tick
//! - **Memory composites**: Sequences and selectors resume at the running child
//! - **Validated construction**: Malformed trees are rejected before the first tick
//! - **Fault isolation**: A panicking node fails instead of halting the tick
//!
//! # Architecture
//!
//! - [`Behavior`]: Core trait for all nodes
//! - [`Status`]: Success, Failure or Running
//! - Composite nodes: [`Sequence`], [`Selector`], [`Parallel`]
//! - Decorator nodes: [`Inverter`], [`Contained`]

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod decorator;
pub mod error;
pub mod status;

// Re-export core types for ergonomic API
pub use behavior::Behavior;
pub use builder::Node;
pub use composite::{Parallel, Selector, Sequence};
pub use decorator::{Contained, FaultLog, Inverter};
pub use error::TreeError;
pub use status::Status;
