//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on decision-making and scheduling.

pub mod errors;
pub mod handle;
pub mod perception;
pub mod providers;

pub use errors::{CollaboratorKind, CommandFailure, InputError, Result, RuntimeError};
pub use handle::{StopHandle, StopSignal, stop_channel};
pub use perception::{SnapshotPublisher, WatchSnapshotSource, snapshot_channel};
pub use providers::{InputSink, NullSink, ScriptedSource, SnapshotSource};
