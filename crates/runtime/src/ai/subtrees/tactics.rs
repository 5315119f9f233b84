//! Layer 2: one subtree per behavior state.
//!
//! Each tactic starts with an [`InState`] guard, so at most one of them gets
//! past its first child in a tick.

use agent_core::{AgentConfig, BehaviorState};
use behavior_tree::builder::{selector, sequence};
use behavior_tree::TreeError;

use super::{BehaviorTree, patterns};
use crate::ai::decision::GatherGoal;
use crate::ai::nodes::{
    BuildShelter, CraftItem, Forage, GoalIs, HasMaterials, Harvest, InState, Wander,
};

fn guarded(state: BehaviorState, body: BehaviorTree) -> Result<BehaviorTree, TreeError> {
    sequence(
        state.into(),
        vec![patterns::check("in_state", InState(state)), body],
    )
}

/// Escape the threat; with nothing to escape from, eat to recover.
pub fn fleeing(config: &AgentConfig) -> Result<BehaviorTree, TreeError> {
    guarded(
        BehaviorState::Fleeing,
        selector(
            "flee_or_recover",
            vec![patterns::flee_from_threat(config)?, patterns::recover(config)?],
        )?,
    )
}

pub fn combat() -> Result<BehaviorTree, TreeError> {
    guarded(BehaviorState::Combat, patterns::engage_threat()?)
}

/// Food runs forage the target or fall back to a ration; material runs
/// harvest the target.
pub fn gathering(config: &AgentConfig) -> Result<BehaviorTree, TreeError> {
    let food = sequence(
        "food",
        vec![
            patterns::check("wants_food", GoalIs(GatherGoal::Food)),
            selector(
                "find_food",
                vec![
                    patterns::approach_then(
                        "forage",
                        config,
                        patterns::act("forage", Forage),
                    )?,
                    patterns::eat_ration(),
                ],
            )?,
        ],
    )?;
    let materials =
        patterns::approach_then("harvest", config, patterns::act("harvest", Harvest::swing()))?;

    guarded(
        BehaviorState::Gathering,
        selector("gather", vec![food, materials])?,
    )
}

pub fn looting(config: &AgentConfig) -> Result<BehaviorTree, TreeError> {
    guarded(
        BehaviorState::Looting,
        patterns::approach_then("loot", config, patterns::act("loot", Harvest::pick_up()))?,
    )
}

pub fn building(config: &AgentConfig) -> Result<BehaviorTree, TreeError> {
    guarded(
        BehaviorState::Building,
        sequence(
            "build",
            vec![
                patterns::check("can_build", HasMaterials(config.build_cost)),
                patterns::act("build_shelter", BuildShelter::new(config.build_cost)),
            ],
        )?,
    )
}

pub fn crafting(config: &AgentConfig) -> Result<BehaviorTree, TreeError> {
    guarded(
        BehaviorState::Crafting,
        sequence(
            "craft",
            vec![
                patterns::check("can_craft", HasMaterials(config.craft_cost)),
                patterns::act("craft_item", CraftItem::new(config.craft_cost)),
            ],
        )?,
    )
}

pub fn exploring(config: &AgentConfig) -> Result<BehaviorTree, TreeError> {
    guarded(
        BehaviorState::Exploring,
        patterns::act("wander", Wander::new(config.wander_turn_every)),
    )
}
