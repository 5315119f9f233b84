//! Action nodes for the agent's behavior tree.
//!
//! Action nodes emit [`Command`]s through their [`ActionScope`]. They represent
//! concrete things the player character can do. Multi-tick actions keep their
//! progress in the node and clear it in `reset`.

use agent_core::{Command, Direction};
use behavior_tree::Status;

use super::{ActionNode, ActionScope};
use crate::ai::blackboard::keys;

/// Runs away from the threat target.
///
/// Strafes to the side of the frame opposite the threat and holds forward
/// while the threat is within `danger_radius`. Returns `Success` once the
/// threat is farther than that, `Failure` if no threat is selected.
///
/// # Example
///
/// ```rust,ignore
/// sequence("escape", vec![
///     Box::new(Check(HasThreatTarget)),
///     Box::new(Act::new("flee", FleeFromThreat::new(10.0, 960.0))),
/// ])
/// ```
pub struct FleeFromThreat {
    danger_radius: f32,
    frame_mid_x: f32,
    heading: Option<Direction>,
}

impl FleeFromThreat {
    pub fn new(danger_radius: f32, frame_mid_x: f32) -> Self {
        Self {
            danger_radius,
            frame_mid_x,
            heading: None,
        }
    }

    /// Threat on the left half of the frame → run right, otherwise left.
    fn away_from(&self, threat_x: f32) -> Direction {
        if threat_x < self.frame_mid_x {
            Direction::Right
        } else {
            Direction::Left
        }
    }
}

impl ActionNode for FleeFromThreat {
    fn run(&mut self, scope: &mut ActionScope<'_>) -> Status {
        let Some(threat) = scope.threat_target().cloned() else {
            return Status::Failure;
        };

        if threat.distance > self.danger_radius {
            if self.heading.take().is_some() {
                scope.emit(Command::StopMoving);
            }
            return Status::Success;
        }

        let away = self.away_from(threat.bbox.center().x);
        if self.heading != Some(away) {
            scope.emit(Command::walk(away));
            scope.emit(Command::walk(Direction::Forward));
            self.heading = Some(away);
        }
        Status::Running
    }

    fn reset(&mut self) {
        self.heading = None;
    }
}

/// Puts the crosshair on the threat target.
pub struct AimAtThreat;

impl ActionNode for AimAtThreat {
    fn run(&mut self, scope: &mut ActionScope<'_>) -> Status {
        let Some(center) = scope.threat_target().map(|t| t.bbox.center()) else {
            return Status::Failure;
        };
        scope.emit(Command::aim(center.x, center.y));
        Status::Success
    }
}

/// Pulls the trigger.
pub struct FireWeapon;

impl ActionNode for FireWeapon {
    fn run(&mut self, scope: &mut ActionScope<'_>) -> Status {
        scope.emit(Command::Fire);
        Status::Success
    }
}

/// Walks to the resource target.
///
/// Aims at the target every tick and holds forward until it is within
/// `interact_range`, then releases movement and succeeds. Fails when no
/// target is selected.
pub struct ApproachTarget {
    interact_range: f32,
    walking: bool,
}

impl ApproachTarget {
    pub fn new(interact_range: f32) -> Self {
        Self {
            interact_range,
            walking: false,
        }
    }
}

impl ActionNode for ApproachTarget {
    fn run(&mut self, scope: &mut ActionScope<'_>) -> Status {
        let Some(target) = scope.resource_target().cloned() else {
            return Status::Failure;
        };

        if target.distance <= self.interact_range {
            if self.walking {
                scope.emit(Command::StopMoving);
                self.walking = false;
            }
            return Status::Success;
        }

        let center = target.bbox.center();
        scope.emit(Command::aim(center.x, center.y));
        if !self.walking {
            scope.emit(Command::walk(Direction::Forward));
            self.walking = true;
        }
        Status::Running
    }

    fn reset(&mut self) {
        self.walking = false;
    }
}

/// Works the target in reach with `tool` and banks one material.
pub struct Harvest {
    tool: Command,
}

impl Harvest {
    /// Swings the held tool (`Fire`), for trees, rocks and ore.
    pub fn swing() -> Self {
        Self { tool: Command::Fire }
    }

    /// Uses the target (`Interact`), for containers and pickups.
    pub fn pick_up() -> Self {
        Self {
            tool: Command::Interact,
        }
    }
}

impl ActionNode for Harvest {
    fn run(&mut self, scope: &mut ActionScope<'_>) -> Status {
        if scope.resource_target().is_none() {
            return Status::Failure;
        }
        scope.emit(self.tool);
        bump(scope, |materials| materials.saturating_add(1))
    }
}

/// Picks up the food in reach and eats it.
pub struct Forage;

impl ActionNode for Forage {
    fn run(&mut self, scope: &mut ActionScope<'_>) -> Status {
        if scope.resource_target().is_none() {
            return Status::Failure;
        }
        scope.emit(Command::Interact);
        scope.emit(Command::Eat);
        Status::Success
    }
}

/// Eats a ration from the inventory.
pub struct EatRation;

impl ActionNode for EatRation {
    fn run(&mut self, scope: &mut ActionScope<'_>) -> Status {
        scope.emit(Command::Eat);
        match scope
            .node_view()
            .update(keys::RATIONS_EATEN, 0, |n| n.saturating_add(1))
        {
            Ok(_) => Status::Success,
            Err(err) => {
                tracing::warn!(%err, "could not record ration");
                Status::Failure
            }
        }
    }
}

/// Places a building part, spending `cost` materials.
pub struct BuildShelter {
    cost: u32,
}

impl BuildShelter {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl ActionNode for BuildShelter {
    fn run(&mut self, scope: &mut ActionScope<'_>) -> Status {
        spend(scope, self.cost, Command::Build)
    }
}

/// Crafts one item, spending `cost` materials.
pub struct CraftItem {
    cost: u32,
}

impl CraftItem {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl ActionNode for CraftItem {
    fn run(&mut self, scope: &mut ActionScope<'_>) -> Status {
        spend(scope, self.cost, Command::Craft)
    }
}

/// Explores: holds forward and strafes left for one tick every
/// `turn_every` ticks. Never finishes on its own.
pub struct Wander {
    turn_every: u32,
    ticks: u32,
    turning: bool,
}

impl Wander {
    pub fn new(turn_every: u32) -> Self {
        Self {
            turn_every: turn_every.max(1),
            ticks: 0,
            turning: false,
        }
    }
}

impl ActionNode for Wander {
    fn run(&mut self, scope: &mut ActionScope<'_>) -> Status {
        self.ticks = self.ticks.wrapping_add(1);

        if self.ticks % self.turn_every == 0 {
            scope.emit(Command::walk(Direction::Left));
            self.turning = true;
        } else if self.ticks == 1 || self.turning {
            scope.emit(Command::walk(Direction::Forward));
            self.turning = false;
        }
        Status::Running
    }

    fn reset(&mut self) {
        self.ticks = 0;
        self.turning = false;
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn bump(scope: &mut ActionScope<'_>, f: impl FnOnce(u32) -> u32) -> Status {
    match scope.node_view().update(keys::MATERIALS, 0, f) {
        Ok(_) => Status::Success,
        Err(err) => {
            tracing::warn!(%err, "could not update materials");
            Status::Failure
        }
    }
}

fn spend(scope: &mut ActionScope<'_>, cost: u32, command: Command) -> Status {
    if scope.materials() < cost {
        return Status::Failure;
    }
    scope.emit(command);
    bump(scope, |materials| materials - cost)
}

#[cfg(test)]
mod tests {
    use agent_core::{BoundingBox, Detection, PerceptionSnapshot};
    use behavior_tree::Behavior;

    use super::*;
    use crate::ai::blackboard::Blackboard;
    use crate::ai::context::AgentContext;
    use crate::ai::nodes::Act;

    fn context(threat: Option<Detection>, resource: Option<Detection>) -> AgentContext {
        let mut ctx = AgentContext::new();
        ctx.begin_tick(1, Some(PerceptionSnapshot::new(0)));
        set_targets(ctx.blackboard_mut(), threat, resource);
        ctx
    }

    fn set_targets(board: &mut Blackboard, threat: Option<Detection>, resource: Option<Detection>) {
        match threat {
            Some(t) => board.set(keys::THREAT_TARGET, t),
            None => {
                board.remove(keys::THREAT_TARGET);
            }
        }
        match resource {
            Some(r) => board.set(keys::RESOURCE_TARGET, r),
            None => {
                board.remove(keys::RESOURCE_TARGET);
            }
        }
    }

    fn at(x: f32, distance: f32) -> Detection {
        Detection::new("wolf", 0.9, BoundingBox::new(x - 10.0, 500.0, x + 10.0, 560.0), distance)
    }

    #[test]
    fn flee_runs_away_from_threat_side() {
        let mut ctx = context(Some(at(300.0, 5.0)), None);
        let mut flee = Act::new("flee", FleeFromThreat::new(10.0, 960.0));

        assert_eq!(flee.tick(&mut ctx), Status::Running);
        assert_eq!(
            ctx.take_commands(),
            vec![
                Command::walk(Direction::Right),
                Command::walk(Direction::Forward)
            ]
        );

        // Same heading: nothing new to press.
        assert_eq!(flee.tick(&mut ctx), Status::Running);
        assert!(ctx.take_commands().is_empty());

        set_targets(ctx.blackboard_mut(), Some(at(1500.0, 6.0)), None);
        assert_eq!(flee.tick(&mut ctx), Status::Running);
        assert_eq!(ctx.take_commands()[0], Command::walk(Direction::Left));

        set_targets(ctx.blackboard_mut(), Some(at(1500.0, 25.0)), None);
        assert_eq!(flee.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.take_commands(), vec![Command::StopMoving]);
    }

    #[test]
    fn flee_without_threat_fails() {
        let mut ctx = context(None, None);
        let mut flee = Act::new("flee", FleeFromThreat::new(10.0, 960.0));
        assert_eq!(flee.tick(&mut ctx), Status::Failure);
    }

    #[test]
    fn approach_walks_until_in_range() {
        let tree = Detection::new("tree", 0.9, BoundingBox::new(900.0, 400.0, 1000.0, 600.0), 6.0);
        let mut ctx = context(None, Some(tree.clone()));
        let mut approach = Act::new("approach", ApproachTarget::new(2.0));

        assert_eq!(approach.tick(&mut ctx), Status::Running);
        assert_eq!(
            ctx.take_commands(),
            vec![Command::aim(950.0, 500.0), Command::walk(Direction::Forward)]
        );

        assert_eq!(approach.tick(&mut ctx), Status::Running);
        assert_eq!(ctx.take_commands(), vec![Command::aim(950.0, 500.0)]);

        let close = Detection { distance: 1.5, ..tree };
        set_targets(ctx.blackboard_mut(), None, Some(close));
        assert_eq!(approach.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.take_commands(), vec![Command::StopMoving]);
    }

    #[test]
    fn harvest_banks_materials() {
        let stone = Detection::new("stone", 0.9, BoundingBox::default(), 1.0);
        let mut ctx = context(None, Some(stone));
        let mut harvest = Act::new("harvest", Harvest::swing());

        harvest.tick(&mut ctx);
        harvest.tick(&mut ctx);

        assert_eq!(ctx.materials(), 2);
        assert_eq!(ctx.take_commands(), vec![Command::Fire, Command::Fire]);
    }

    #[test]
    fn building_spends_materials_or_fails_silently() {
        let mut ctx = context(None, None);
        ctx.node_view().set(keys::MATERIALS, 12).unwrap();
        let mut build = Act::new("build", BuildShelter::new(10));

        assert_eq!(build.tick(&mut ctx), Status::Success);
        assert_eq!(ctx.materials(), 2);
        assert_eq!(ctx.take_commands(), vec![Command::Build]);

        assert_eq!(build.tick(&mut ctx), Status::Failure);
        assert!(ctx.take_commands().is_empty());
    }

    #[test]
    fn wander_turns_periodically() {
        let mut ctx = context(None, None);
        let mut wander = Act::new("wander", Wander::new(3));
        let mut per_tick = Vec::new();
        for _ in 0..5 {
            assert_eq!(wander.tick(&mut ctx), Status::Running);
            per_tick.push(ctx.take_commands());
        }

        assert_eq!(per_tick[0], vec![Command::walk(Direction::Forward)]);
        assert!(per_tick[1].is_empty());
        assert_eq!(per_tick[2], vec![Command::walk(Direction::Left)]);
        assert_eq!(per_tick[3], vec![Command::walk(Direction::Forward)]);
        assert!(per_tick[4].is_empty());
    }

    #[test]
    fn eating_counts_rations() {
        let mut ctx = context(None, None);
        let mut eat = Act::new("eat", EatRation);
        eat.tick(&mut ctx);
        assert_eq!(ctx.blackboard().get(keys::RATIONS_EATEN), Some(&1));
        assert_eq!(ctx.take_commands(), vec![Command::Eat]);
    }
}
