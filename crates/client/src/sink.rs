//! Input collaborator that only reports what it was asked to do.

use agent_core::Command;
use async_trait::async_trait;
use runtime::{InputError, InputSink};

/// Logs each command as a JSON line at INFO; never fails.
#[derive(Debug, Default)]
pub struct LoggingSink {
    executed: u64,
}

#[async_trait]
impl InputSink for LoggingSink {
    async fn execute(&mut self, command: &Command) -> Result<(), InputError> {
        self.executed += 1;
        match serde_json::to_string(command) {
            Ok(json) => tracing::info!(target: "agent::input", "{}", json),
            Err(_) => tracing::info!(target: "agent::input", "{}", command),
        }
        Ok(())
    }

    async fn release_all(&mut self) -> Result<(), InputError> {
        tracing::info!(
            target: "agent::input",
            "Released all input after {} commands",
            self.executed
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use agent_core::Direction;

    use super::*;

    #[tokio::test]
    async fn counts_executed_commands() {
        let mut sink = LoggingSink::default();

        sink.execute(&Command::walk(Direction::Left))
            .await
            .expect("logging never fails");
        sink.execute(&Command::Fire).await.expect("logging never fails");
        sink.release_all().await.expect("logging never fails");

        assert_eq!(sink.executed, 2);
    }
}
