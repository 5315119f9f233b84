//! Agent configuration loading for the binary.
//!
//! Order of precedence, lowest first: built-in defaults, the TOML file,
//! `AGENT_*` environment variables. The merged result is validated once.

use std::env;
use std::path::Path;

use agent_core::AgentConfig;
use anyhow::{Context, Result};

/// Loads the TOML file at `path` (defaults when it does not exist), applies
/// environment overrides, and validates the result.
pub fn load(path: &Path) -> Result<AgentConfig> {
    let config = read_file(path)?;
    let config = apply_overrides(config, |key| env::var(key).ok())?;
    config
        .validate()
        .with_context(|| format!("invalid agent configuration ({})", path.display()))?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<AgentConfig> {
    if !path.exists() {
        tracing::warn!("Config file {} not found, using defaults", path.display());
        return Ok(AgentConfig::default());
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = AgentConfig::parse_toml(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Applies `AGENT_*` overrides read through `lookup`. An unparseable value is
/// an error naming the variable.
pub fn apply_overrides(
    mut config: AgentConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AgentConfig> {
    if let Some(v) = read_env::<f64>(&lookup, "AGENT_TICKS_PER_SECOND")? {
        config.target_ticks_per_second = v;
    }
    if let Some(v) = read_env::<u64>(&lookup, "AGENT_SNAPSHOT_TIMEOUT_MS")? {
        config.snapshot_timeout_ms = v;
    }
    if let Some(v) = read_env::<f32>(&lookup, "AGENT_CONFIDENCE_THRESHOLD")? {
        config.confidence_threshold = v;
    }
    if let Some(v) = read_env::<f32>(&lookup, "AGENT_CRITICAL_HEALTH")? {
        config.critical_health_threshold = v;
    }
    if let Some(v) = read_env::<f32>(&lookup, "AGENT_LOW_HEALTH")? {
        config.low_health_threshold = v;
    }
    if let Some(v) = read_env::<f32>(&lookup, "AGENT_HUNGER_THRESHOLD")? {
        config.hunger_threshold = v;
    }
    if let Some(v) = read_env::<f32>(&lookup, "AGENT_DANGER_RADIUS")? {
        config.danger_radius = v;
    }
    if let Some(v) = read_env::<u32>(&lookup, "AGENT_RESOURCE_QUOTA")? {
        config.resource_quota = v;
    }

    Ok(config)
}

fn read_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let value: T = raw
        .trim()
        .parse()
        .with_context(|| format!("invalid value for {}: {:?}", key, raw))?;
    tracing::info!("Config override {}={}", key, raw.trim());
    Ok(Some(value))
}
