//! Asynchronous seams to the vision and input collaborators.
//!
//! Runtime users plug in [`SnapshotSource`] and [`InputSink`] implementations
//! so the decision loop can run against a live game, a replay file, or test
//! fixtures.
use std::collections::VecDeque;

use agent_core::{Command, PerceptionSnapshot};
use async_trait::async_trait;

use super::errors::InputError;

/// Produces perception snapshots.
///
/// Different implementations can handle:
/// - Live capture and object detection
/// - Recorded sessions
/// - Testing fixtures
#[async_trait]
pub trait SnapshotSource: Send {
    /// Next snapshot, or `None` when no fresh one is available.
    ///
    /// Called once per tick; the runner bounds the wait with its snapshot
    /// timeout.
    async fn next_snapshot(&mut self) -> Option<PerceptionSnapshot>;
}

/// Carries out commands on the game client.
#[async_trait]
pub trait InputSink: Send {
    /// Executes one command. Called once per command, in emission order.
    async fn execute(&mut self, command: &Command) -> Result<(), InputError>;

    /// Releases every held key and button. Called once on shutdown.
    async fn release_all(&mut self) -> Result<(), InputError> {
        Ok(())
    }
}

#[async_trait]
impl<T: SnapshotSource + ?Sized> SnapshotSource for Box<T> {
    async fn next_snapshot(&mut self) -> Option<PerceptionSnapshot> {
        (**self).next_snapshot().await
    }
}

#[async_trait]
impl<T: InputSink + ?Sized> InputSink for Box<T> {
    async fn execute(&mut self, command: &Command) -> Result<(), InputError> {
        (**self).execute(command).await
    }

    async fn release_all(&mut self) -> Result<(), InputError> {
        (**self).release_all().await
    }
}

/// Plays back a fixed list of frames; `None` entries and an exhausted script
/// both mean "no fresh snapshot".
#[derive(Debug, Default)]
pub struct ScriptedSource {
    frames: VecDeque<Option<PerceptionSnapshot>>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = Option<PerceptionSnapshot>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    async fn next_snapshot(&mut self) -> Option<PerceptionSnapshot> {
        self.frames.pop_front().flatten()
    }
}

/// Drops every command. Useful for dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl InputSink for NullSink {
    async fn execute(&mut self, _command: &Command) -> Result<(), InputError> {
        Ok(())
    }
}
