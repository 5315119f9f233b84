//! Condition nodes for the agent's behavior tree.
//!
//! Condition nodes check the tick context and return Success or Failure.
//! They never emit commands or write to the blackboard.

use agent_core::{BehaviorState, PerceptionSnapshot};

use super::ConditionNode;
use crate::ai::context::AgentContext;
use crate::ai::decision::GatherGoal;

/// Checks that the decision engine selected a given behavior state.
///
/// Every top-level subtree is guarded by one of these.
///
/// # Example
///
/// ```rust,ignore
/// sequence("combat", vec![
///     Box::new(Check(InState(BehaviorState::Combat))),
///     Box::new(Act::new("fire", FireWeapon)),
/// ])
/// ```
pub struct InState(pub BehaviorState);

impl ConditionNode for InState {
    fn check(&self, ctx: &AgentContext, _snapshot: &PerceptionSnapshot) -> bool {
        ctx.state() == self.0
    }
}

/// Checks that a threat target is selected.
pub struct HasThreatTarget;

impl ConditionNode for HasThreatTarget {
    fn check(&self, ctx: &AgentContext, _snapshot: &PerceptionSnapshot) -> bool {
        ctx.threat_target().is_some()
    }
}

/// Checks that the threat target is at or inside the given distance.
///
/// At critical health the threat target is the nearest hostile, however far.
pub struct ThreatWithin(pub f32);

impl ConditionNode for ThreatWithin {
    fn check(&self, ctx: &AgentContext, _snapshot: &PerceptionSnapshot) -> bool {
        ctx.threat_target().is_some_and(|threat| threat.distance <= self.0)
    }
}

/// Checks that a resource, loot, or food target is selected.
pub struct HasResourceTarget;

impl ConditionNode for HasResourceTarget {
    fn check(&self, ctx: &AgentContext, _snapshot: &PerceptionSnapshot) -> bool {
        ctx.resource_target().is_some()
    }
}

/// Checks what the current gathering run is for.
pub struct GoalIs(pub GatherGoal);

impl ConditionNode for GoalIs {
    fn check(&self, ctx: &AgentContext, _snapshot: &PerceptionSnapshot) -> bool {
        ctx.gather_goal() == self.0
    }
}

/// Checks that at least this many materials are held.
pub struct HasMaterials(pub u32);

impl ConditionNode for HasMaterials {
    fn check(&self, ctx: &AgentContext, _snapshot: &PerceptionSnapshot) -> bool {
        ctx.materials() >= self.0
    }
}
