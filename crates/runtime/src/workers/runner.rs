//! Fixed-rate tree runner.
//!
//! The runner owns the tree, the tick context, and both collaborators. Each
//! tick it acquires a snapshot, lets the decision engine update the
//! blackboard, ticks the root exactly once, and dispatches the emitted
//! commands in order. Ticks never overlap, and a tick that overruns its
//! period is followed immediately by the next one without catching up on the
//! boundaries it missed.

use std::time::Duration;

use agent_core::{AgentConfig, BehaviorState, Command, PerceptionSnapshot};
use behavior_tree::builder::contained;
use behavior_tree::{Behavior, Status};
use tokio::time::Instant;

use super::stats::RunnerStats;
use crate::ai::blackboard::keys;
use crate::ai::context::{AgentContext, NodeFault};
use crate::ai::decision::{Decision, GatherGoal};
use crate::ai::engine::DecisionEngine;
use crate::ai::subtrees::{BehaviorTree, strategies};
use crate::api::{CommandFailure, InputSink, Result, SnapshotSource, StopSignal};

/// Everything that happened during one tick.
#[derive(Debug)]
pub struct TickReport {
    pub tick: u64,
    pub decision: Decision,
    pub status: Status,
    /// Commands dispatched, in emission order.
    pub commands: Vec<Command>,
    pub failures: Vec<CommandFailure>,
    pub faults: Vec<NodeFault>,
    /// False when the tick reused an earlier snapshot or had none.
    pub fresh_snapshot: bool,
    pub elapsed: Duration,
}

/// Drives the decision engine and the tree at a bounded rate.
pub struct TreeRunner<S, I> {
    config: AgentConfig,
    engine: DecisionEngine,
    root: BehaviorTree,
    ctx: AgentContext,
    source: S,
    sink: I,
    stats: RunnerStats,
    tick: u64,
    /// State and goal the running branches were started under.
    active_plan: Option<(BehaviorState, GatherGoal)>,
    /// Last movement command the sink accepted was a `Move`.
    moving: bool,
}

impl<S: SnapshotSource, I: InputSink> TreeRunner<S, I> {
    /// Runner for the standard survival tree.
    pub fn new(config: AgentConfig, source: S, sink: I) -> Result<Self> {
        config.validate()?;
        let root = strategies::survival(&config)?;
        Self::with_tree(config, root, source, sink)
    }

    /// Runner for a custom tree.
    pub fn with_tree(config: AgentConfig, root: BehaviorTree, source: S, sink: I) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: DecisionEngine::new(config.clone()),
            root: contained("root", root),
            config,
            ctx: AgentContext::new(),
            source,
            sink,
            stats: RunnerStats::new(),
            tick: 0,
            active_plan: None,
            moving: false,
        })
    }

    pub fn context(&self) -> &AgentContext {
        &self.ctx
    }

    pub fn stats(&self) -> &RunnerStats {
        &self.stats
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Runs one full tick without waiting for the next boundary.
    pub async fn tick_once(&mut self) -> TickReport {
        let started = Instant::now();
        self.tick += 1;
        let tick = self.tick;

        let snapshot = self.acquire_snapshot().await;
        let fresh_snapshot = snapshot.is_some();
        self.ctx.begin_tick(tick, snapshot);
        if !fresh_snapshot {
            self.stats.stale_ticks += 1;
            tracing::debug!(
                tick,
                reusing = self.ctx.snapshot().is_some(),
                "no fresh snapshot"
            );
        }

        let decision = {
            let (snapshot, board) = self.ctx.engine_view();
            self.engine.update(snapshot, board)
        };

        // A branch left Running under the previous plan must not resume past
        // its guards, and the keys it held go with it.
        let plan = (decision.state, decision.goal);
        if self.active_plan != Some(plan) {
            if self.active_plan.is_some() {
                tracing::debug!(
                    tick,
                    state = %decision.state,
                    goal = %decision.goal,
                    "plan changed; resetting tree"
                );
            }
            self.root.reset();
            self.active_plan = Some(plan);
            if self.moving {
                self.ctx.commit(vec![Command::StopMoving]);
            }
        }

        let status = self.root.tick(&mut self.ctx);
        let commands = self.ctx.take_commands();
        let faults = self.ctx.take_faults();
        let failures = self.dispatch(&commands).await;

        self.ctx
            .blackboard_mut()
            .set(keys::COMMAND_FAILURES, failures.clone());

        self.stats.ticks += 1;
        self.stats.node_faults += faults.len() as u64;

        tracing::trace!(
            tick,
            state = %decision.state,
            ?status,
            commands = commands.len(),
            failures = failures.len(),
            "tick complete"
        );

        TickReport {
            tick,
            decision,
            status,
            commands,
            failures,
            faults,
            fresh_snapshot,
            elapsed: started.elapsed(),
        }
    }

    /// Ticks until `stop` is signalled, then releases all input and returns
    /// the final statistics.
    ///
    /// Stop requests are observed only between ticks.
    pub async fn run(mut self, mut stop: StopSignal) -> RunnerStats {
        let period = self.config.tick_period();
        tracing::info!(
            ticks_per_second = self.config.target_ticks_per_second,
            "tree runner started"
        );

        loop {
            if stop.is_stopped() {
                break;
            }

            let tick_start = Instant::now();
            let report = self.tick_once().await;

            if report.tick % self.config.stats_log_interval == 0 {
                self.stats.log_progress();
            }

            let elapsed = tick_start.elapsed();
            if elapsed > period {
                let dropped = lost_periods(elapsed, period);
                self.stats.overruns += 1;
                self.stats.dropped_ticks += dropped;
                tracing::debug!(
                    tick = report.tick,
                    elapsed_ms = elapsed.as_millis() as u64,
                    dropped,
                    "tick overran its period"
                );
                continue;
            }

            tokio::select! {
                _ = tokio::time::sleep_until(tick_start + period) => {}
                _ = stop.stopped() => break,
            }
        }

        if let Err(err) = self.sink.release_all().await {
            tracing::warn!(%err, "failed to release input on shutdown");
        }

        tracing::info!(
            ticks = self.stats.ticks,
            dropped = self.stats.dropped_ticks,
            stale = self.stats.stale_ticks,
            "tree runner stopped"
        );
        self.stats
    }

    async fn acquire_snapshot(&mut self) -> Option<PerceptionSnapshot> {
        let timeout = self.config.snapshot_timeout();
        match tokio::time::timeout(timeout, self.source.next_snapshot()).await {
            Ok(Some(mut snapshot)) => {
                if let Err(err) = snapshot.validate() {
                    tracing::warn!(%err, "discarding malformed snapshot");
                    return None;
                }
                snapshot.retain_confident(self.config.confidence_threshold);
                Some(snapshot)
            }
            Ok(None) => None,
            Err(_) => {
                tracing::debug!(
                    timeout_ms = timeout.as_millis() as u64,
                    "snapshot acquisition timed out"
                );
                None
            }
        }
    }

    async fn dispatch(&mut self, commands: &[Command]) -> Vec<CommandFailure> {
        let mut failures = Vec::new();
        for command in commands {
            match self.sink.execute(command).await {
                Ok(()) => {
                    self.stats.commands_sent += 1;
                    match command {
                        Command::Move { .. } => self.moving = true,
                        Command::StopMoving => self.moving = false,
                        _ => {}
                    }
                }
                Err(error) => {
                    tracing::warn!(%command, %error, "input collaborator rejected command");
                    self.stats.commands_failed += 1;
                    failures.push(CommandFailure {
                        command: *command,
                        error,
                    });
                }
            }
        }
        failures
    }
}

/// Whole periods that passed beyond the one the tick was scheduled in.
fn lost_periods(elapsed: Duration, period: Duration) -> u64 {
    let over = elapsed.saturating_sub(period).as_nanos();
    let period = period.as_nanos().max(1);
    (over / period) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_periods_counts_whole_periods() {
        let period = Duration::from_millis(100);
        assert_eq!(lost_periods(Duration::from_millis(100), period), 0);
        assert_eq!(lost_periods(Duration::from_millis(150), period), 0);
        assert_eq!(lost_periods(Duration::from_millis(300), period), 2);
        assert_eq!(lost_periods(Duration::from_millis(350), period), 2);
    }
}
