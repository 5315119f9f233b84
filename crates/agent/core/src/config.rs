//! Agent configuration and validation.
//!
//! Every option has a documented default, unknown keys are ignored, and
//! [`AgentConfig::validate`] rejects out-of-range values instead of clamping
//! them so tuning mistakes surface at startup.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors reported before the first tick.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("`{key}` = {value} is out of range (expected {expected})")]
    OutOfRange {
        key: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error(
        "`low_health_threshold` ({low}) must not be below `critical_health_threshold` ({critical})"
    )]
    ThresholdOrder { low: f32, critical: f32 },

    #[error("threat rating for `{label}` = {value} is out of range (expected 0.0..=1.0)")]
    ThreatRating { label: String, value: f32 },
}

/// What a detection label means to the decision engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EntityClass {
    Hostile,
    Resource,
    Loot,
    Food,
}

/// Detector label vocabularies, one list per [`EntityClass`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub hostile: Vec<String>,
    pub resource: Vec<String>,
    pub loot: Vec<String>,
    pub food: Vec<String>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        fn labels(names: &[&str]) -> Vec<String> {
            names.iter().map(|s| (*s).to_string()).collect()
        }

        Self {
            hostile: labels(&["player", "bear", "wolf", "scientist", "boar"]),
            resource: labels(&["tree", "stone", "ore", "hemp"]),
            loot: labels(&["crate", "barrel"]),
            food: labels(&["mushroom", "corn", "pumpkin"]),
        }
    }
}

impl LabelConfig {
    /// Classifies a detector label. Hostile wins if a label is listed twice.
    pub fn classify(&self, label: &str) -> Option<EntityClass> {
        let listed = |names: &[String]| names.iter().any(|n| n == label);

        if listed(&self.hostile) {
            Some(EntityClass::Hostile)
        } else if listed(&self.food) {
            Some(EntityClass::Food)
        } else if listed(&self.loot) {
            Some(EntityClass::Loot)
        } else if listed(&self.resource) {
            Some(EntityClass::Resource)
        } else {
            None
        }
    }
}

/// Tunable parameters for the decision engine and the tree runner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Health below this (percent) is a CRITICAL concern.
    pub critical_health_threshold: f32,
    /// Minimum health (percent) to pick a fight.
    pub low_health_threshold: f32,
    /// Hunger below this (percent) is a HIGH concern.
    pub hunger_threshold: f32,
    /// Hostiles at or inside this distance are immediate threats.
    pub danger_radius: f32,
    /// Threat rating at which an immediate hostile counts as lethal.
    pub lethal_threat_rating: f32,
    /// Tick rate ceiling.
    pub target_ticks_per_second: f64,
    /// Longest wait for a fresh snapshot before reusing the previous one.
    pub snapshot_timeout_ms: u64,
    /// Detections below this confidence are dropped before the tree sees them.
    pub confidence_threshold: f32,
    /// Distance at which a target can be harvested or looted.
    pub interact_range: f32,
    /// Materials wanted before resource gathering stops being a concern.
    pub resource_quota: u32,
    /// Materials spent per building part.
    pub build_cost: u32,
    /// Materials spent per crafted item.
    pub craft_cost: u32,
    /// Consecutive ticks with failed commands before a target is abandoned.
    pub max_target_failures: u32,
    /// Ticks during which resource targets are ignored after abandoning one.
    pub target_cooldown_ticks: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Exploration turns every this many ticks.
    pub wander_turn_every: u32,
    /// Runner statistics are logged every this many ticks.
    pub stats_log_interval: u64,
    pub labels: LabelConfig,
    /// Per-label danger in `0.0..=1.0`; unlisted hostiles rate
    /// [`AgentConfig::DEFAULT_THREAT_RATING`].
    pub threat_ratings: BTreeMap<String, f32>,
}

impl AgentConfig {
    pub const DEFAULT_CRITICAL_HEALTH: f32 = 20.0;
    pub const DEFAULT_LOW_HEALTH: f32 = 50.0;
    pub const DEFAULT_HUNGER: f32 = 30.0;
    pub const DEFAULT_DANGER_RADIUS: f32 = 10.0;
    pub const DEFAULT_LETHAL_THREAT_RATING: f32 = 0.7;
    pub const DEFAULT_TICKS_PER_SECOND: f64 = 10.0;
    pub const DEFAULT_SNAPSHOT_TIMEOUT_MS: u64 = 50;
    pub const DEFAULT_CONFIDENCE: f32 = 0.5;
    pub const DEFAULT_THREAT_RATING: f32 = 0.5;

    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document and validates it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config = Self::parse_toml(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document without validating, for callers that layer
    /// further overrides on top before calling [`AgentConfig::validate`].
    pub fn parse_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Duration of one tick at the configured rate ceiling.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_ticks_per_second)
    }

    pub fn snapshot_timeout(&self) -> Duration {
        Duration::from_millis(self.snapshot_timeout_ms)
    }

    pub fn classify(&self, label: &str) -> Option<EntityClass> {
        self.labels.classify(label)
    }

    pub fn threat_rating(&self, label: &str) -> f32 {
        self.threat_ratings
            .get(label)
            .copied()
            .unwrap_or(Self::DEFAULT_THREAT_RATING)
    }

    /// Checks every option; the first violation is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        percent("critical_health_threshold", self.critical_health_threshold)?;
        percent("low_health_threshold", self.low_health_threshold)?;
        percent("hunger_threshold", self.hunger_threshold)?;
        if self.low_health_threshold < self.critical_health_threshold {
            return Err(ConfigError::ThresholdOrder {
                low: self.low_health_threshold,
                critical: self.critical_health_threshold,
            });
        }

        non_negative("danger_radius", self.danger_radius)?;
        non_negative("interact_range", self.interact_range)?;
        unit("lethal_threat_rating", self.lethal_threat_rating)?;
        unit("confidence_threshold", self.confidence_threshold)?;

        let rate = self.target_ticks_per_second;
        let period = Duration::try_from_secs_f64(1.0 / rate).unwrap_or(Duration::ZERO);
        if !rate.is_finite() || rate <= 0.0 || period.is_zero() {
            return Err(ConfigError::OutOfRange {
                key: "target_ticks_per_second",
                value: rate,
                expected: "a finite value > 0 with a representable tick period",
            });
        }

        positive("snapshot_timeout_ms", self.snapshot_timeout_ms)?;
        positive("build_cost", self.build_cost.into())?;
        positive("craft_cost", self.craft_cost.into())?;
        positive("max_target_failures", self.max_target_failures.into())?;
        positive("frame_width", self.frame_width.into())?;
        positive("frame_height", self.frame_height.into())?;
        positive("wander_turn_every", self.wander_turn_every.into())?;
        positive("stats_log_interval", self.stats_log_interval)?;

        for (label, &value) in &self.threat_ratings {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThreatRating {
                    label: label.clone(),
                    value,
                });
            }
        }

        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        let threat_ratings = [
            ("player", 0.9),
            ("bear", 0.95),
            ("wolf", 0.7),
            ("scientist", 0.85),
            ("boar", 0.3),
        ]
        .into_iter()
        .map(|(label, rating)| (label.to_string(), rating))
        .collect();

        Self {
            critical_health_threshold: Self::DEFAULT_CRITICAL_HEALTH,
            low_health_threshold: Self::DEFAULT_LOW_HEALTH,
            hunger_threshold: Self::DEFAULT_HUNGER,
            danger_radius: Self::DEFAULT_DANGER_RADIUS,
            lethal_threat_rating: Self::DEFAULT_LETHAL_THREAT_RATING,
            target_ticks_per_second: Self::DEFAULT_TICKS_PER_SECOND,
            snapshot_timeout_ms: Self::DEFAULT_SNAPSHOT_TIMEOUT_MS,
            confidence_threshold: Self::DEFAULT_CONFIDENCE,
            interact_range: 2.0,
            resource_quota: 12,
            build_cost: 10,
            craft_cost: 4,
            max_target_failures: 3,
            target_cooldown_ticks: 20,
            frame_width: 1920,
            frame_height: 1080,
            wander_turn_every: 20,
            stats_log_interval: 100,
            labels: LabelConfig::default(),
            threat_ratings,
        }
    }
}

fn percent(key: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            key,
            value: value.into(),
            expected: "0..=100",
        })
    }
}

fn unit(key: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            key,
            value: value.into(),
            expected: "0.0..=1.0",
        })
    }
}

fn non_negative(key: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            key,
            value: value.into(),
            expected: "a finite value >= 0",
        })
    }
}

fn positive(key: &'static str, value: u64) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            key,
            value: 0.0,
            expected: "a value > 0",
        })
    }
}
