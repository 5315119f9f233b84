//! Priority-based behavior state selection.
//!
//! The [`DecisionEngine`] runs once per tick, before the tree. It reads the
//! snapshot and blackboard facts, computes a [`Decision`] without touching
//! anything, then applies the whole decision to the blackboard in one step.

use agent_core::{
    AgentConfig, BehaviorState, Detection, EntityClass, PerceptionSnapshot, PriorityLevel,
};

use super::blackboard::{Blackboard, keys};
use super::decision::{Decision, DecisionReason, GatherGoal, TargetFeedback};

/// Maps perception and blackboard facts to a behavior state.
#[derive(Clone, Debug)]
pub struct DecisionEngine {
    config: AgentConfig,
}

impl DecisionEngine {
    pub fn new(config: AgentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Computes the decision for this tick. Pure: the same inputs always give
    /// the same decision.
    ///
    /// # Decision Process
    ///
    /// 1. **Critical**: critical health or a lethal threat → Fleeing, or
    ///    defensive Combat when healthy enough to fight the threat
    /// 2. **High**: visible hostile and healthy → Combat; else hungry →
    ///    Gathering food
    /// 3. **Medium**: below the resource quota → Gathering or Looting
    /// 4. **Low**: enough materials → Building, else Crafting
    /// 5. **Default**: Exploring
    pub fn decide(&self, snapshot: Option<&PerceptionSnapshot>, board: &Blackboard) -> Decision {
        let feedback = self.assess_feedback(board);
        self.select(snapshot, board, feedback).with_feedback(feedback)
    }

    /// Decides and writes the result to `board`.
    pub fn update(&self, snapshot: Option<&PerceptionSnapshot>, board: &mut Blackboard) -> Decision {
        let decision = self.decide(snapshot, board);
        self.apply(&decision, board);
        decision
    }

    /// Writes every engine-owned fact carried by `decision`.
    pub fn apply(&self, decision: &Decision, board: &mut Blackboard) {
        let previous = board.get(keys::BEHAVIOR_STATE).copied();
        if previous != Some(decision.state) {
            tracing::info!(
                from = ?previous,
                to = %decision.state,
                priority = %decision.priority,
                reason = %decision.reason,
                "behavior state changed"
            );
        }

        board.set(keys::BEHAVIOR_STATE, decision.state);
        board.set(keys::PRIORITY, decision.priority);
        board.set(keys::DECISION_REASON, decision.reason);
        board.set(keys::GATHER_GOAL, decision.goal);

        match &decision.threat {
            Some(threat) => {
                board.set(keys::THREAT_TARGET, threat.clone());
                board.set(keys::LAST_KNOWN_THREAT, threat.clone());
            }
            None => {
                board.remove(keys::THREAT_TARGET);
            }
        }
        match &decision.resource {
            Some(resource) => board.set(keys::RESOURCE_TARGET, resource.clone()),
            None => {
                board.remove(keys::RESOURCE_TARGET);
            }
        }

        board.set(keys::TARGET_FAILURES, decision.feedback.failure_streak);
        board.set(keys::TARGET_COOLDOWN, decision.feedback.cooldown);
    }

    fn assess_feedback(&self, board: &Blackboard) -> TargetFeedback {
        let failed = board
            .get(keys::COMMAND_FAILURES)
            .is_some_and(|failures| !failures.is_empty());
        let held_target = board.contains(keys::RESOURCE_TARGET);
        let streak = board.get(keys::TARGET_FAILURES).copied().unwrap_or(0);
        let cooldown = board.get(keys::TARGET_COOLDOWN).copied().unwrap_or(0);

        let mut feedback = TargetFeedback {
            failure_streak: if failed && held_target { streak + 1 } else { 0 },
            cooldown: cooldown.saturating_sub(1),
            abandoned: false,
        };

        if feedback.failure_streak >= self.config.max_target_failures {
            tracing::debug!(
                streak = feedback.failure_streak,
                cooldown = self.config.target_cooldown_ticks,
                "abandoning resource target after repeated command failures"
            );
            feedback = TargetFeedback {
                failure_streak: 0,
                cooldown: self.config.target_cooldown_ticks,
                abandoned: true,
            };
        }

        feedback
    }

    fn select(
        &self,
        snapshot: Option<&PerceptionSnapshot>,
        board: &Blackboard,
        feedback: TargetFeedback,
    ) -> Decision {
        let Some(snapshot) = snapshot else {
            tracing::debug!("DecisionEngine: no snapshot yet → Exploring");
            return Decision::new(
                BehaviorState::Exploring,
                PriorityLevel::Minimal,
                DecisionReason::NoSnapshot,
            );
        };

        let config = &self.config;
        let health = f32::from(snapshot.health_or_full());
        let hunger = f32::from(snapshot.hunger_or_full());
        let materials = board.get(keys::MATERIALS).copied().unwrap_or(0);

        let hostiles = self.of_class(snapshot, &[EntityClass::Hostile]);
        let lethal = hostiles
            .iter()
            .filter(|(_, d)| {
                d.distance <= config.danger_radius
                    && config.threat_rating(&d.label) >= config.lethal_threat_rating
            })
            .copied();
        let lethal = most_dangerous(config, lethal);

        tracing::debug!(
            "DecisionEngine: health={}, hunger={}, materials={}, hostiles={}, lethal={}",
            health,
            hunger,
            materials,
            hostiles.len(),
            lethal.is_some()
        );

        // ====================================================================
        // Critical: survival
        // ====================================================================

        if health < config.critical_health_threshold {
            let threat = lethal.or_else(|| nearest(hostiles.iter().copied()));
            tracing::debug!("  → Fleeing (critical health)");
            return Decision::new(
                BehaviorState::Fleeing,
                PriorityLevel::Critical,
                DecisionReason::CriticalHealth,
            )
            .with_threat(threat);
        }

        if let Some(threat) = lethal {
            let state = if health >= config.low_health_threshold {
                BehaviorState::Combat
            } else {
                BehaviorState::Fleeing
            };
            tracing::debug!("  → {} (lethal {} at {})", state, threat.label, threat.distance);
            return Decision::new(state, PriorityLevel::Critical, DecisionReason::LethalThreat)
                .with_threat(Some(threat));
        }

        // ====================================================================
        // High: combat opportunity, then hunger
        // ====================================================================

        if health >= config.low_health_threshold {
            if let Some(target) = most_dangerous(config, hostiles.iter().copied()) {
                tracing::debug!("  → Combat (engaging {})", target.label);
                return Decision::new(
                    BehaviorState::Combat,
                    PriorityLevel::High,
                    DecisionReason::CombatOpportunity,
                )
                .with_threat(Some(target));
            }
        }

        if hunger < config.hunger_threshold {
            let food = nearest(self.of_class(snapshot, &[EntityClass::Food]).into_iter());
            tracing::debug!("  → Gathering food (hunger {})", hunger);
            return Decision::new(
                BehaviorState::Gathering,
                PriorityLevel::High,
                DecisionReason::Hunger,
            )
            .with_goal(GatherGoal::Food)
            .with_resource(food);
        }

        // ====================================================================
        // Medium: resource need
        // ====================================================================

        if materials < config.resource_quota {
            if feedback.cooldown > 0 {
                tracing::debug!("  Resource targets cooling down ({} ticks)", feedback.cooldown);
            } else {
                let candidates =
                    self.of_class(snapshot, &[EntityClass::Resource, EntityClass::Loot]);
                if let Some(target) = nearest(candidates.into_iter()) {
                    let state = match config.classify(&target.label) {
                        Some(EntityClass::Loot) => BehaviorState::Looting,
                        _ => BehaviorState::Gathering,
                    };
                    tracing::debug!("  → {} ({} at {})", state, target.label, target.distance);
                    return Decision::new(
                        state,
                        PriorityLevel::Medium,
                        DecisionReason::ResourceNeed,
                    )
                    .with_goal(GatherGoal::Materials)
                    .with_resource(Some(target));
                }
            }
        }

        // ====================================================================
        // Low: spend materials
        // ====================================================================

        if materials >= config.build_cost {
            tracing::debug!("  → Building ({} materials)", materials);
            return Decision::new(
                BehaviorState::Building,
                PriorityLevel::Low,
                DecisionReason::CanBuild,
            );
        }

        if materials >= config.craft_cost {
            tracing::debug!("  → Crafting ({} materials)", materials);
            return Decision::new(
                BehaviorState::Crafting,
                PriorityLevel::Low,
                DecisionReason::CanCraft,
            );
        }

        tracing::debug!("  → Exploring (nothing pressing)");
        Decision::new(
            BehaviorState::Exploring,
            PriorityLevel::Minimal,
            DecisionReason::NothingPressing,
        )
    }

    /// Detections of the given classes, tagged with their position in the
    /// snapshot.
    fn of_class<'s>(
        &self,
        snapshot: &'s PerceptionSnapshot,
        classes: &[EntityClass],
    ) -> Vec<(usize, &'s Detection)> {
        snapshot
            .detections
            .iter()
            .enumerate()
            .filter(|(_, d)| {
                self.config
                    .classify(&d.label)
                    .is_some_and(|class| classes.contains(&class))
            })
            .collect()
    }
}

/// Nearest detection; ties go to the higher confidence, then the earlier one.
fn nearest<'s>(candidates: impl Iterator<Item = (usize, &'s Detection)>) -> Option<&'s Detection> {
    candidates
        .min_by(|(ia, a), (ib, b)| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| b.confidence.total_cmp(&a.confidence))
                .then_with(|| ia.cmp(ib))
        })
        .map(|(_, d)| d)
}

/// Highest-rated hostile; ties go to the nearer, then the earlier one.
fn most_dangerous<'s>(
    config: &AgentConfig,
    candidates: impl Iterator<Item = (usize, &'s Detection)>,
) -> Option<&'s Detection> {
    candidates
        .min_by(|(ia, a), (ib, b)| {
            let rating = |d: &Detection| config.threat_rating(&d.label);
            rating(b)
                .total_cmp(&rating(a))
                .then_with(|| a.distance.total_cmp(&b.distance))
                .then_with(|| ia.cmp(ib))
        })
        .map(|(_, d)| d)
}
