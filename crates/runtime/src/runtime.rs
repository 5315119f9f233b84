//! High-level runtime orchestrator.
//!
//! The runtime wires the collaborators into a [`TreeRunner`], spawns it on
//! the tokio runtime, and exposes a builder-based API plus a stop handle.

use agent_core::AgentConfig;
use tokio::task::JoinHandle;

use crate::ai::subtrees::BehaviorTree;
use crate::api::{
    CollaboratorKind, InputSink, Result, RuntimeError, SnapshotSource, StopHandle, stop_channel,
};
use crate::workers::{RunnerStats, TreeRunner};

/// A running agent.
///
/// Design: the runner task owns the tree and the blackboard; [`Runtime`]
/// keeps the join handle and a [`StopHandle`] that can be cloned for
/// signal handlers.
pub struct Runtime {
    stop: StopHandle,
    runner_handle: JoinHandle<RunnerStats>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle that stops the runner at the next tick boundary
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Wait for the runner to stop on its own (through a [`StopHandle`]).
    pub async fn wait(self) -> Result<RunnerStats> {
        self.runner_handle.await.map_err(RuntimeError::WorkerJoin)
    }

    /// Request a stop and wait for the runner to finish its current tick.
    pub async fn shutdown(self) -> Result<RunnerStats> {
        self.stop.stop();
        self.wait().await
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: AgentConfig,
    source: Option<Box<dyn SnapshotSource>>,
    sink: Option<Box<dyn InputSink>>,
    tree: Option<BehaviorTree>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: AgentConfig::default(),
            source: None,
            sink: None,
            tree: None,
        }
    }

    /// Override agent configuration
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the vision collaborator
    pub fn source(mut self, source: impl SnapshotSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Set the input collaborator
    pub fn sink(mut self, sink: impl InputSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Replace the standard survival tree
    pub fn tree(mut self, tree: BehaviorTree) -> Self {
        self.tree = Some(tree);
        self
    }

    /// Validate everything and start the runner.
    ///
    /// Must be called from within a tokio runtime. Configuration and tree
    /// errors are returned before the first tick.
    pub fn build(self) -> Result<Runtime> {
        let source = self.source.ok_or(RuntimeError::CollaboratorNotSet {
            kind: CollaboratorKind::Vision,
        })?;
        let sink = self.sink.ok_or(RuntimeError::CollaboratorNotSet {
            kind: CollaboratorKind::Input,
        })?;

        let runner = match self.tree {
            Some(tree) => TreeRunner::with_tree(self.config, tree, source, sink)?,
            None => TreeRunner::new(self.config, source, sink)?,
        };

        let (stop, signal) = stop_channel();
        let runner_handle = tokio::spawn(runner.run(signal));

        Ok(Runtime {
            stop,
            runner_handle,
        })
    }
}
