//! Recorded perception played back as a vision collaborator.
//!
//! One [`PerceptionSnapshot`] per JSON line. A blank line or `null` stands
//! for a tick where vision had nothing new.

use std::collections::VecDeque;
use std::path::Path;

use agent_core::PerceptionSnapshot;
use anyhow::{Context, Result};
use async_trait::async_trait;
use runtime::{SnapshotSource, StopHandle};

pub struct ReplaySource {
    frames: VecDeque<Option<PerceptionSnapshot>>,
    /// Stopped once the recording runs out.
    on_exhausted: Option<StopHandle>,
}

impl ReplaySource {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read replay {}", path.display()))?;
        let source = Self::parse(&text)
            .with_context(|| format!("failed to parse replay {}", path.display()))?;
        tracing::info!(
            "Loaded replay {} ({} frames)",
            path.display(),
            source.remaining()
        );
        Ok(source)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let frames = text
            .lines()
            .enumerate()
            .map(|(index, line)| -> Result<Option<PerceptionSnapshot>> {
                let line = line.trim();
                if line.is_empty() {
                    return Ok(None);
                }
                let frame = serde_json::from_str::<Option<PerceptionSnapshot>>(line)
                    .with_context(|| format!("line {}", index + 1))?;
                if let Some(snapshot) = &frame {
                    snapshot
                        .validate()
                        .with_context(|| format!("line {}", index + 1))?;
                }
                Ok(frame)
            })
            .collect::<Result<VecDeque<_>>>()?;

        Ok(Self {
            frames,
            on_exhausted: None,
        })
    }

    /// Requests a stop through `stop` when the last frame has been handed out.
    pub fn stop_when_exhausted(mut self, stop: StopHandle) -> Self {
        self.on_exhausted = Some(stop);
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl SnapshotSource for ReplaySource {
    async fn next_snapshot(&mut self) -> Option<PerceptionSnapshot> {
        let frame = self.frames.pop_front().flatten();
        if self.frames.is_empty() {
            if let Some(stop) = self.on_exhausted.take() {
                tracing::info!("Replay finished");
                stop.stop();
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDING: &str = r#"
{"timestamp": 1, "health": 80, "detections": [{"label": "wolf", "confidence": 0.9, "bbox": {"x1": 0.0, "y1": 0.0, "x2": 10.0, "y2": 10.0}, "distance": 4.0}]}
null
{"timestamp": 3, "hunger": 20}
"#;

    #[tokio::test]
    async fn blank_and_null_lines_are_missing_frames() {
        let mut source = ReplaySource::parse(RECORDING).expect("valid replay");
        assert_eq!(source.remaining(), 4);

        // leading blank line
        assert!(source.next_snapshot().await.is_none());

        let first = source.next_snapshot().await.expect("first frame");
        assert_eq!(first.timestamp, 1);
        assert_eq!(first.health, Some(80));
        assert_eq!(first.detections[0].label, "wolf");

        assert!(source.next_snapshot().await.is_none());

        let third = source.next_snapshot().await.expect("third frame");
        assert_eq!(third.hunger, Some(20));
        assert!(third.detections.is_empty());
    }

    #[test]
    fn bad_line_reports_its_number() {
        let err = ReplaySource::parse("null\n{\"timestamp\": \"soon\"}")
            .err()
            .expect("parse error");
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn out_of_range_reading_is_rejected() {
        let err = ReplaySource::parse("{\"timestamp\": 1, \"health\": 150}")
            .err()
            .expect("validation error");
        let message = format!("{err:#}");
        assert!(message.contains("line 1"));
        assert!(message.contains("health"));
    }

    #[tokio::test]
    async fn exhausted_replay_requests_stop() {
        let (stop, signal) = runtime::stop_channel();
        let mut source = ReplaySource::parse("{\"timestamp\": 1}")
            .expect("valid replay")
            .stop_when_exhausted(stop);

        assert!(source.next_snapshot().await.is_some());
        assert!(signal.is_stopped());
        assert!(source.next_snapshot().await.is_none());
    }
}
