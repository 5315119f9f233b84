use std::sync::{Arc, Mutex};

use agent_core::{
    AgentConfig, BehaviorState, BoundingBox, Command, Detection, Direction, PerceptionSnapshot,
    PriorityLevel,
};
use async_trait::async_trait;
use behavior_tree::builder::selector;
use behavior_tree::Status;
use runtime::ai::nodes::{ActionNode, ActionScope, FireWeapon};
use runtime::ai::subtrees::patterns;
use runtime::{
    DecisionEngine, DecisionReason, GatherGoal, InputError, InputSink, ScriptedSource, TreeRunner,
    keys,
};

// ============================================================================
// Fixtures
// ============================================================================

/// Records every command; optionally rejects all of them.
#[derive(Clone, Default)]
struct RecordingSink {
    log: Arc<Mutex<Vec<Command>>>,
    reject: bool,
}

impl RecordingSink {
    fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl InputSink for RecordingSink {
    async fn execute(&mut self, command: &Command) -> Result<(), InputError> {
        self.log.lock().unwrap().push(*command);
        if self.reject {
            Err(InputError::Unavailable("window lost focus".into()))
        } else {
            Ok(())
        }
    }
}

fn detection(label: &str, distance: f32) -> Detection {
    Detection::new(label, 0.9, BoundingBox::new(100.0, 400.0, 200.0, 600.0), distance)
}

fn runner(
    config: AgentConfig,
    frames: Vec<Option<PerceptionSnapshot>>,
    sink: RecordingSink,
) -> TreeRunner<ScriptedSource, RecordingSink> {
    TreeRunner::new(config, ScriptedSource::new(frames), sink).expect("valid runner")
}

// ============================================================================
// Decision scenarios
// ============================================================================

/// Critical health with a hostile inside the danger radius makes the agent
/// run away from the side of the screen the hostile is on.
#[tokio::test]
async fn critical_health_with_close_hostile_flees() {
    let config = AgentConfig {
        critical_health_threshold: 20.0,
        danger_radius: 10.0,
        ..AgentConfig::default()
    };
    let snapshot = PerceptionSnapshot::new(0)
        .with_health(15)
        .with_detection(detection("wolf", 5.0));
    let mut runner = runner(config, vec![Some(snapshot)], RecordingSink::default());

    let report = runner.tick_once().await;

    assert_eq!(report.decision.state, BehaviorState::Fleeing);
    assert_eq!(report.decision.priority, PriorityLevel::Critical);
    assert_eq!(report.status, Status::Running);
    assert_eq!(
        report.commands,
        vec![
            Command::walk(Direction::Right),
            Command::walk(Direction::Forward)
        ]
    );
}

/// Hunger below threshold and nothing hostile around is a gathering (eating)
/// concern, not exploration.
#[tokio::test]
async fn hunger_drives_gathering_not_exploring() {
    let config = AgentConfig {
        hunger_threshold: 40.0,
        ..AgentConfig::default()
    };
    let snapshot = PerceptionSnapshot::new(0).with_health(80).with_hunger(30);
    let mut runner = runner(config, vec![Some(snapshot)], RecordingSink::default());

    let report = runner.tick_once().await;

    assert_eq!(report.decision.state, BehaviorState::Gathering);
    assert_eq!(report.decision.reason, DecisionReason::Hunger);
    assert_eq!(report.commands, vec![Command::Eat]);
}

/// Equal confidence, different distances: the nearer resource wins.
#[tokio::test]
async fn nearest_resource_is_selected() {
    let snapshot = PerceptionSnapshot::new(0)
        .with_detection(detection("tree", 8.0))
        .with_detection(detection("stone", 3.0));
    let mut runner = runner(
        AgentConfig::default(),
        vec![Some(snapshot)],
        RecordingSink::default(),
    );

    let report = runner.tick_once().await;

    let target = report.decision.resource.expect("a resource target");
    assert_eq!(target.distance, 3.0);
    assert_eq!(target.label, "stone");
    assert_eq!(
        runner.context().resource_target().map(|d| d.distance),
        Some(3.0)
    );
}

/// Whenever a CRITICAL predicate holds, the decision is Fleeing or Combat,
/// whatever else is going on.
#[test]
fn critical_predicates_preempt_everything() {
    let config = AgentConfig::default();
    let engine = DecisionEngine::new(config.clone());
    let mut board = runtime::Blackboard::new();
    board.set(keys::MATERIALS, 50);

    let extras = [
        vec![],
        vec![detection("tree", 1.0)],
        vec![detection("crate", 2.0), detection("mushroom", 1.0)],
        vec![detection("boar", 40.0)],
    ];

    for health in (0..20u8).step_by(3) {
        for hunger in [0u8, 50, 100] {
            for extra in &extras {
                let mut snapshot = PerceptionSnapshot::new(0)
                    .with_health(health)
                    .with_hunger(hunger);
                snapshot.detections = extra.clone();

                let decision = engine.decide(Some(&snapshot), &board);
                assert_eq!(decision.priority, PriorityLevel::Critical);
                assert_eq!(decision.state, BehaviorState::Fleeing, "health {health}");
            }
        }
    }

    // Lethal threat at full health: defensive combat, never anything lower.
    for extra in &extras {
        let mut snapshot = PerceptionSnapshot::new(0).with_hunger(0);
        snapshot.detections = extra.clone();
        snapshot.detections.push(detection("bear", 4.0));

        let decision = engine.decide(Some(&snapshot), &board);
        assert_eq!(decision.priority, PriorityLevel::Critical);
        assert!(matches!(
            decision.state,
            BehaviorState::Combat | BehaviorState::Fleeing
        ));
    }
}

/// Low health and a lethal threat at the same time: fleeing wins.
#[test]
fn fleeing_wins_when_both_critical_predicates_hold() {
    let engine = DecisionEngine::new(AgentConfig::default());
    let snapshot = PerceptionSnapshot::new(0)
        .with_health(10)
        .with_detection(detection("bear", 3.0));

    let decision = engine.decide(Some(&snapshot), &runtime::Blackboard::new());

    assert_eq!(decision.state, BehaviorState::Fleeing);
    assert_eq!(decision.reason, DecisionReason::CriticalHealth);
}

// ============================================================================
// Runner behavior
// ============================================================================

/// Missing snapshots reuse the previous one; the tick still runs.
#[tokio::test]
async fn stale_ticks_reuse_previous_snapshot() {
    let snapshot = PerceptionSnapshot::new(0)
        .with_health(90)
        .with_detection(detection("wolf", 30.0));
    let mut runner = runner(
        AgentConfig::default(),
        vec![Some(snapshot), None, None],
        RecordingSink::default(),
    );

    let first = runner.tick_once().await;
    let second = runner.tick_once().await;
    let third = runner.tick_once().await;

    assert!(first.fresh_snapshot);
    assert!(!second.fresh_snapshot);
    assert!(!third.fresh_snapshot);
    assert_eq!(third.decision.state, BehaviorState::Combat);
    assert_eq!(third.commands, vec![Command::aim(150.0, 500.0), Command::Fire]);
    assert_eq!(runner.stats().stale_ticks, 2);
}

/// A snapshot with impossible HUD readings is discarded like a missing one.
#[tokio::test]
async fn out_of_range_readings_are_discarded() {
    let good = PerceptionSnapshot::new(0)
        .with_health(90)
        .with_detection(detection("wolf", 30.0));
    let broken = PerceptionSnapshot::new(1).with_health(150);
    let mut runner = runner(
        AgentConfig::default(),
        vec![Some(good), Some(broken)],
        RecordingSink::default(),
    );

    runner.tick_once().await;
    let report = runner.tick_once().await;

    assert!(!report.fresh_snapshot);
    assert_eq!(report.decision.state, BehaviorState::Combat);
    assert_eq!(runner.context().snapshot().map(|s| s.timestamp), Some(0));
}

/// Before the first snapshot every condition fails and nothing is emitted.
#[tokio::test]
async fn no_snapshot_ever_means_idle() {
    let mut runner = runner(AgentConfig::default(), vec![None, None], RecordingSink::default());

    for _ in 0..2 {
        let report = runner.tick_once().await;
        assert_eq!(report.decision.reason, DecisionReason::NoSnapshot);
        assert_eq!(report.status, Status::Failure);
        assert!(report.commands.is_empty());
    }
}

/// Low-confidence detections never reach the engine.
#[tokio::test]
async fn low_confidence_detections_are_dropped() {
    let ghost = Detection::new("bear", 0.3, BoundingBox::default(), 2.0);
    let snapshot = PerceptionSnapshot::new(0).with_detection(ghost);
    let mut runner = runner(
        AgentConfig::default(),
        vec![Some(snapshot)],
        RecordingSink::default(),
    );

    let report = runner.tick_once().await;

    assert_eq!(report.decision.state, BehaviorState::Exploring);
    assert!(runner.context().snapshot().unwrap().detections.is_empty());
}

/// A state change preempts a branch that was still running.
#[tokio::test]
async fn state_change_preempts_running_branch() {
    let quiet = PerceptionSnapshot::new(0);
    let hostile = PerceptionSnapshot::new(1)
        .with_health(90)
        .with_detection(detection("wolf", 30.0));
    let mut runner = runner(
        AgentConfig::default(),
        vec![Some(quiet), Some(hostile)],
        RecordingSink::default(),
    );

    let exploring = runner.tick_once().await;
    assert_eq!(exploring.status, Status::Running);
    assert_eq!(exploring.commands, vec![Command::walk(Direction::Forward)]);

    let combat = runner.tick_once().await;
    assert_eq!(combat.decision.state, BehaviorState::Combat);
    assert_eq!(
        combat.commands,
        vec![Command::StopMoving, Command::aim(150.0, 500.0), Command::Fire]
    );
}

/// Hunger arriving mid-harvest keeps the agent in Gathering but switches the
/// goal: the half-finished approach is dropped and the food is eaten, not
/// swung at.
#[tokio::test]
async fn goal_change_within_gathering_preempts_running_branch() {
    let walking = PerceptionSnapshot::new(0).with_detection(detection("tree", 8.0));
    let hungry = PerceptionSnapshot::new(1)
        .with_hunger(10)
        .with_detection(detection("tree", 8.0))
        .with_detection(detection("mushroom", 1.0));
    let mut runner = runner(
        AgentConfig::default(),
        vec![Some(walking), Some(hungry)],
        RecordingSink::default(),
    );

    let first = runner.tick_once().await;
    assert_eq!(first.decision.state, BehaviorState::Gathering);
    assert_eq!(first.decision.goal, GatherGoal::Materials);
    assert_eq!(first.status, Status::Running);
    assert_eq!(
        first.commands,
        vec![
            Command::aim(150.0, 500.0),
            Command::walk(Direction::Forward)
        ]
    );

    let second = runner.tick_once().await;
    assert_eq!(second.decision.state, BehaviorState::Gathering);
    assert_eq!(second.decision.goal, GatherGoal::Food);
    assert_eq!(
        second.decision.resource.as_ref().map(|d| d.label.as_str()),
        Some("mushroom")
    );
    assert_eq!(
        second.commands,
        vec![Command::StopMoving, Command::Interact, Command::Eat]
    );
    assert_eq!(runner.context().materials(), 0);
}

/// Critical health with the only hostile far outside the danger radius:
/// nothing to run from, so the agent eats every tick instead of idling.
#[tokio::test]
async fn critical_health_with_distant_hostile_recovers() {
    let snapshot = PerceptionSnapshot::new(0)
        .with_health(10)
        .with_detection(detection("wolf", 25.0));
    let mut runner = runner(
        AgentConfig::default(),
        vec![Some(snapshot); 3],
        RecordingSink::default(),
    );

    for _ in 0..3 {
        let report = runner.tick_once().await;
        assert_eq!(report.decision.state, BehaviorState::Fleeing);
        assert_eq!(report.status, Status::Success);
        assert_eq!(report.commands, vec![Command::Eat]);
    }
}

/// A flight that gets out of range releases movement, then recovers.
#[tokio::test]
async fn escape_finishes_then_recovers() {
    let close = PerceptionSnapshot::new(0)
        .with_health(10)
        .with_detection(detection("wolf", 5.0));
    let far = PerceptionSnapshot::new(1)
        .with_health(10)
        .with_detection(detection("wolf", 25.0));
    let mut runner = runner(
        AgentConfig::default(),
        vec![Some(close), Some(far.clone()), Some(far)],
        RecordingSink::default(),
    );

    let fleeing = runner.tick_once().await;
    assert_eq!(fleeing.status, Status::Running);
    assert_eq!(
        fleeing.commands,
        vec![
            Command::walk(Direction::Right),
            Command::walk(Direction::Forward)
        ]
    );

    let escaped = runner.tick_once().await;
    assert_eq!(escaped.status, Status::Success);
    assert_eq!(escaped.commands, vec![Command::StopMoving]);

    let recovering = runner.tick_once().await;
    assert_eq!(recovering.commands, vec![Command::Eat]);
}

/// Commands the input side keeps rejecting make the engine give up on the
/// target and leave resources alone for a while.
#[tokio::test]
async fn rejected_commands_abandon_the_target() {
    let config = AgentConfig {
        max_target_failures: 3,
        target_cooldown_ticks: 5,
        ..AgentConfig::default()
    };
    let snapshot = PerceptionSnapshot::new(0).with_detection(detection("tree", 6.0));
    let sink = RecordingSink::rejecting();
    let mut runner = runner(config, vec![Some(snapshot); 6], sink.clone());

    for _ in 0..3 {
        let report = runner.tick_once().await;
        assert_eq!(report.decision.state, BehaviorState::Gathering);
        assert!(!report.failures.is_empty());
    }

    let report = runner.tick_once().await;
    assert!(report.decision.feedback.abandoned);
    assert_eq!(report.decision.state, BehaviorState::Exploring);
    assert!(runner.context().resource_target().is_none());

    let report = runner.tick_once().await;
    assert_eq!(report.decision.state, BehaviorState::Exploring);
    assert!(runner.stats().commands_failed >= 4);
    assert_eq!(runner.stats().commands_sent, 0);
    assert!(!sink.log.lock().unwrap().is_empty());
}

struct Explodes;

impl ActionNode for Explodes {
    fn run(&mut self, _scope: &mut ActionScope<'_>) -> Status {
        panic!("detector returned a malformed box");
    }
}

/// A panicking node fails its branch; the rest of the tick carries on.
#[tokio::test]
async fn node_panic_is_contained() {
    let tree = selector(
        "root",
        vec![
            patterns::act("explodes", Explodes),
            patterns::act("fire", FireWeapon),
        ],
    )
    .expect("non-empty selector");
    let mut runner = TreeRunner::with_tree(
        AgentConfig::default(),
        tree,
        ScriptedSource::new([Some(PerceptionSnapshot::new(0))]),
        RecordingSink::default(),
    )
    .expect("valid runner");

    let report = runner.tick_once().await;

    assert_eq!(report.status, Status::Success);
    assert_eq!(report.commands, vec![Command::Fire]);
    assert_eq!(report.faults.len(), 1);
    assert_eq!(report.faults[0].node, "explodes");
    assert!(report.faults[0].message.contains("malformed box"));
    assert_eq!(runner.stats().node_faults, 1);

    // The next tick runs normally.
    let report = runner.tick_once().await;
    assert_eq!(report.tick, 2);
}
