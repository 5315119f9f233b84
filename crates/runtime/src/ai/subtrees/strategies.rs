//! Layer 3: the root of the agent's tree.

use agent_core::AgentConfig;
use behavior_tree::builder::selector;
use behavior_tree::TreeError;

use super::{BehaviorTree, tactics};

/// The full survival tree.
///
/// A selector over every tactic, most urgent first. Only the tactic matching
/// the engine's current state gets past its guard, so the order matters only
/// for readability and for the cost of failed guards.
pub fn survival(config: &AgentConfig) -> Result<BehaviorTree, TreeError> {
    selector(
        "survival",
        vec![
            tactics::fleeing(config)?,
            tactics::combat()?,
            tactics::gathering(config)?,
            tactics::looting(config)?,
            tactics::building(config)?,
            tactics::crafting(config)?,
            tactics::exploring(config)?,
        ],
    )
}
