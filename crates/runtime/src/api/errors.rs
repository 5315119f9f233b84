//! Unified error types surfaced by the runtime API.
//!
//! Configuration and tree-shape problems are reported before the first tick;
//! nothing that happens during a tick is fatal.
use std::fmt;

use agent_core::{Command, ConfigError};
use behavior_tree::TreeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid behavior tree")]
    Tree(#[from] TreeError),

    #[error("{kind} collaborator not set")]
    CollaboratorNotSet { kind: CollaboratorKind },

    #[error("tree runner join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CollaboratorKind {
    Vision,
    Input,
}

impl fmt::Display for CollaboratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CollaboratorKind::Vision => "vision",
            CollaboratorKind::Input => "input",
        };
        write!(f, "{}", label)
    }
}

/// Reported by an [`InputSink`](super::InputSink) that could not carry out a
/// command.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum InputError {
    #[error("input device unavailable: {0}")]
    Unavailable(String),

    #[error("command rejected: {0}")]
    Rejected(String),
}

/// A command the input collaborator failed to execute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandFailure {
    pub command: Command,
    pub error: InputError,
}

impl CommandFailure {
    /// Shorthand for a [`InputError::Rejected`] failure.
    pub fn new(command: Command, reason: impl Into<String>) -> Self {
        Self {
            command,
            error: InputError::Rejected(reason.into()),
        }
    }
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.command, self.error)
    }
}
