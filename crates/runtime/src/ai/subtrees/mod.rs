//! Reusable behavior tree subtrees.
//!
//! This module provides a hierarchical library of composable behavior patterns
//! for building the agent's tree. Subtrees are organized into three layers:
//!
//! - **Layer 1 (Patterns)**: Contained leaves and small condition-then-action pairs
//! - **Layer 2 (Tactics)**: One subtree per behavior state, guarded by that state
//! - **Layer 3 (Strategies)**: The root that orders the tactics
//!
//! # Architecture
//!
//! ```text
//! Layer 3 (strategies)
//!     └─ survival()
//!         ├─ fleeing()                    ← Layer 2
//!         │   ├─ flee_from_threat()       ← Layer 1
//!         │   └─ eat_ration()             ← Layer 1
//!         ├─ combat()
//!         │   └─ engage_threat()
//!         ├─ gathering() / looting()
//!         │   └─ approach_then()
//!         ├─ building() / crafting()
//!         └─ exploring()
//! ```
//!
//! Every leaf is wrapped in `Contained`, so a faulty node fails its own branch
//! and the rest of the tick goes on.

pub mod patterns;
pub mod strategies;
pub mod tactics;

use behavior_tree::Node;

use super::context::AgentContext;

/// Type alias for behavior trees to reduce verbosity.
///
/// All subtree functions return this type for consistency.
pub type BehaviorTree = Node<AgentContext>;
