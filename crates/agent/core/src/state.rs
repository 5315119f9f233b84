//! High-level behavior modes and the priority levels that select them.

use serde::{Deserialize, Serialize};

/// The single currently-active high-level mode.
///
/// Only the decision engine moves the agent between states; leaf nodes read
/// the active state but never change it.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BehaviorState {
    /// Wander to find something worth doing.
    #[default]
    Exploring,
    /// Harvest a resource node or forage for food.
    Gathering,
    /// Spend materials on a building part.
    Building,
    /// Engage a hostile.
    Combat,
    /// Break line of sight with a threat.
    Fleeing,
    /// Empty a loot container.
    Looting,
    /// Turn materials into items.
    Crafting,
}

/// Urgency of the concern that produced a decision.
///
/// Variants are declared lowest first so the derived `Ord` gives
/// `Critical > High > Medium > Low > Minimal`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PriorityLevel {
    #[default]
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}
