//! Per-tick output of the decision engine.

use agent_core::{BehaviorState, Detection, PriorityLevel};
use serde::{Deserialize, Serialize};

/// Why the engine picked the current state.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DecisionReason {
    CriticalHealth,
    LethalThreat,
    CombatOpportunity,
    Hunger,
    ResourceNeed,
    CanBuild,
    CanCraft,
    NothingPressing,
    NoSnapshot,
}

/// What a `Gathering` state is meant to collect.
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
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GatherGoal {
    #[default]
    Materials,
    Food,
}

/// Bookkeeping for abandoning resource targets the input side cannot act on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFeedback {
    /// Consecutive ticks with failed commands while a resource target was held.
    pub failure_streak: u32,
    /// Remaining ticks during which resource targets are ignored.
    pub cooldown: u32,
    /// The previous resource target was dropped this tick.
    pub abandoned: bool,
}

/// The engine's choice for one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub state: BehaviorState,
    pub priority: PriorityLevel,
    pub reason: DecisionReason,
    pub threat: Option<Detection>,
    pub resource: Option<Detection>,
    pub goal: GatherGoal,
    pub feedback: TargetFeedback,
}

impl Decision {
    pub fn new(state: BehaviorState, priority: PriorityLevel, reason: DecisionReason) -> Self {
        Self {
            state,
            priority,
            reason,
            threat: None,
            resource: None,
            goal: GatherGoal::default(),
            feedback: TargetFeedback::default(),
        }
    }

    pub fn with_threat(mut self, threat: Option<&Detection>) -> Self {
        self.threat = threat.cloned();
        self
    }

    pub fn with_resource(mut self, resource: Option<&Detection>) -> Self {
        self.resource = resource.cloned();
        self
    }

    pub fn with_goal(mut self, goal: GatherGoal) -> Self {
        self.goal = goal;
        self
    }

    pub(crate) fn with_feedback(mut self, feedback: TargetFeedback) -> Self {
        self.feedback = feedback;
        self
    }
}
