//! Layer 1: leaves and simple condition-then-action patterns.

use agent_core::AgentConfig;
use behavior_tree::builder::{contained, inverter, parallel, sequence};
use behavior_tree::TreeError;

use super::BehaviorTree;
use crate::ai::nodes::{
    Act, ActionNode, AimAtThreat, ApproachTarget, Check, ConditionNode, EatRation, FireWeapon,
    FleeFromThreat, HasResourceTarget, HasThreatTarget, ThreatWithin,
};

/// Condition leaf, fault-contained.
pub fn check<T: ConditionNode + 'static>(name: &'static str, condition: T) -> BehaviorTree {
    contained(name, Box::new(Check(condition)))
}

/// Action leaf, fault-contained.
pub fn act<A: ActionNode + 'static>(name: &'static str, action: A) -> BehaviorTree {
    contained(name, Box::new(Act::new(name, action)))
}

/// Runs from the threat target while it is inside the danger radius.
pub fn flee_from_threat(config: &AgentConfig) -> Result<BehaviorTree, TreeError> {
    let frame_mid_x = config.frame_width as f32 / 2.0;
    sequence(
        "escape",
        vec![
            check("threat_close", ThreatWithin(config.danger_radius)),
            act("flee", FleeFromThreat::new(config.danger_radius, frame_mid_x)),
        ],
    )
}

/// Aims at and shoots the threat target in the same tick.
pub fn engage_threat() -> Result<BehaviorTree, TreeError> {
    sequence(
        "engage",
        vec![
            check("has_threat", HasThreatTarget),
            parallel(
                "aim_and_fire",
                2,
                vec![act("aim", AimAtThreat), act("fire", FireWeapon)],
            )?,
        ],
    )
}

/// Walks to the resource target, then runs `finish` on it.
pub fn approach_then(
    name: &'static str,
    config: &AgentConfig,
    finish: BehaviorTree,
) -> Result<BehaviorTree, TreeError> {
    sequence(
        name,
        vec![
            check("has_resource", HasResourceTarget),
            act("approach", ApproachTarget::new(config.interact_range)),
            finish,
        ],
    )
}

pub fn eat_ration() -> BehaviorTree {
    act("eat_ration", EatRation)
}

/// Eats a ration, but only while no threat is inside the danger radius.
pub fn recover(config: &AgentConfig) -> Result<BehaviorTree, TreeError> {
    sequence(
        "recover",
        vec![
            inverter(check("threat_close", ThreatWithin(config.danger_radius))),
            eat_ration(),
        ],
    )
}
