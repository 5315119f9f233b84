//! Producer/runner hand-off for perception snapshots.
//!
//! The vision producer may run on its own task. Each publish replaces the
//! whole snapshot, so the runner never observes a partially written one, and
//! a snapshot is handed to the runner at most once.
use agent_core::PerceptionSnapshot;
use async_trait::async_trait;
use tokio::sync::watch;

use super::providers::SnapshotSource;

/// Creates a connected publisher/source pair.
pub fn snapshot_channel() -> (SnapshotPublisher, WatchSnapshotSource) {
    let (tx, rx) = watch::channel(None);
    (SnapshotPublisher { tx }, WatchSnapshotSource { rx })
}

/// Producer side, owned by the vision collaborator.
#[derive(Debug)]
pub struct SnapshotPublisher {
    tx: watch::Sender<Option<PerceptionSnapshot>>,
}

impl SnapshotPublisher {
    /// Replaces the pending snapshot. An unread snapshot is overwritten.
    pub fn publish(&self, snapshot: PerceptionSnapshot) {
        self.tx.send_replace(Some(snapshot));
    }
}

/// Runner side of [`snapshot_channel`].
#[derive(Debug)]
pub struct WatchSnapshotSource {
    rx: watch::Receiver<Option<PerceptionSnapshot>>,
}

#[async_trait]
impl SnapshotSource for WatchSnapshotSource {
    async fn next_snapshot(&mut self) -> Option<PerceptionSnapshot> {
        // A closed channel yields nothing new; the runner's timeout and
        // stale-snapshot handling take over.
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().clone()
    }
}
