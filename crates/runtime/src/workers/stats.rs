//! Tree runner statistics.
//!
//! Counts ticks, scheduling overruns, stale snapshots, and dispatch results
//! for progress logging and post-run reporting.

use serde::Serialize;

/// Counters kept by the tree runner.
///
/// Owned by the runner task and returned when it stops, so no
/// synchronization is needed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunnerStats {
    /// Ticks completed.
    pub ticks: u64,

    /// Ticks that took longer than one period.
    pub overruns: u64,

    /// Whole tick periods lost to overruns. These boundaries are skipped,
    /// never replayed.
    pub dropped_ticks: u64,

    /// Ticks that ran on a previous (or no) snapshot.
    pub stale_ticks: u64,

    /// Commands the input collaborator accepted.
    pub commands_sent: u64,

    /// Commands the input collaborator rejected.
    pub commands_failed: u64,

    /// Node panics contained during ticks.
    pub node_faults: u64,
}

impl RunnerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of ticks that ran without a fresh snapshot, in `0.0..=1.0`.
    pub fn stale_ratio(&self) -> f64 {
        if self.ticks == 0 {
            return 0.0;
        }
        self.stale_ticks as f64 / self.ticks as f64
    }

    pub(crate) fn log_progress(&self) {
        tracing::info!(
            ticks = self.ticks,
            overruns = self.overruns,
            dropped = self.dropped_ticks,
            stale = self.stale_ticks,
            sent = self.commands_sent,
            failed = self.commands_failed,
            faults = self.node_faults,
            "tree runner progress"
        );
    }
}
