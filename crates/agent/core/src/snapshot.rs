//! Perception snapshot produced by the vision collaborator once per tick.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Screen-space point in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in screen pixels, `(x1, y1)` top-left and `(x2, y2)`
/// bottom-right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }
}

/// A labeled, scored object found in a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Class name reported by the detector (e.g. `"wolf"`, `"tree"`).
    pub label: String,
    /// Detector confidence in `0.0..=1.0`.
    pub confidence: f32,
    pub bbox: BoundingBox,
    /// Estimated distance from the player, in game units.
    pub distance: f32,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32, bbox: BoundingBox, distance: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
            distance,
        }
    }
}

/// A snapshot the vision collaborator should never have produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("`{field}` reading {value} is outside 0..=100")]
    ReadingOutOfRange { field: &'static str, value: u8 },
}

/// Frozen read of the game state used for exactly one tick.
///
/// `health` and `hunger` are `None` when the HUD reading was not available
/// for this frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerceptionSnapshot {
    /// Capture time in milliseconds, as reported by the producer.
    pub timestamp: u64,
    #[serde(default)]
    pub health: Option<u8>,
    #[serde(default)]
    pub hunger: Option<u8>,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

impl PerceptionSnapshot {
    pub fn new(timestamp: u64) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    pub fn with_health(mut self, health: u8) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_hunger(mut self, hunger: u8) -> Self {
        self.hunger = Some(hunger);
        self
    }

    pub fn with_detection(mut self, detection: Detection) -> Self {
        self.detections.push(detection);
        self
    }

    /// Health reading, treating a missing value as full health.
    pub fn health_or_full(&self) -> u8 {
        self.health.unwrap_or(100)
    }

    /// Hunger reading, treating a missing value as fully fed.
    pub fn hunger_or_full(&self) -> u8 {
        self.hunger.unwrap_or(100)
    }

    /// Checks that the HUD readings are percentages.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for (field, reading) in [("health", self.health), ("hunger", self.hunger)] {
            if let Some(value) = reading.filter(|v| *v > 100) {
                return Err(SnapshotError::ReadingOutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// Drops detections below `threshold` confidence, keeping detection order.
    pub fn retain_confident(&mut self, threshold: f32) {
        self.detections.retain(|d| d.confidence >= threshold);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_center() {
        let bbox = BoundingBox::new(100.0, 200.0, 300.0, 400.0);
        assert_eq!(bbox.center(), Point::new(200.0, 300.0));
    }

    #[test]
    fn retain_confident_keeps_order() {
        let bbox = BoundingBox::default();
        let mut snapshot = PerceptionSnapshot::new(0)
            .with_detection(Detection::new("tree", 0.9, bbox, 4.0))
            .with_detection(Detection::new("wolf", 0.2, bbox, 2.0))
            .with_detection(Detection::new("stone", 0.5, bbox, 6.0));

        snapshot.retain_confident(0.5);

        let labels: Vec<_> = snapshot.detections.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["tree", "stone"]);
    }

    #[test]
    fn readings_above_full_are_rejected() {
        assert!(PerceptionSnapshot::new(0).with_health(100).validate().is_ok());
        assert_eq!(
            PerceptionSnapshot::new(0).with_hunger(150).validate(),
            Err(SnapshotError::ReadingOutOfRange {
                field: "hunger",
                value: 150
            })
        );
    }

    #[test]
    fn missing_readings_count_as_full() {
        let snapshot = PerceptionSnapshot::new(0);
        assert_eq!(snapshot.health_or_full(), 100);
        assert_eq!(snapshot.hunger_or_full(), 100);
    }
}
