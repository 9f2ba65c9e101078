use crate::retry::RetryPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per fetch (including the first).
    pub max_attempts: u32,
    /// Timeout for a single attempt in seconds (e.g. 5.0).
    pub attempt_timeout_secs: f64,
    /// Delay between attempts in seconds (e.g. 1.0 or 0.25).
    pub retry_delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let p = RetryPolicy::default();
        Self {
            max_attempts: p.max_attempts,
            attempt_timeout_secs: p.attempt_timeout.as_secs_f64(),
            retry_delay_secs: p.retry_delay.as_secs_f64(),
        }
    }
}

impl RetryConfig {
    /// Convert to a policy. Negative or non-finite durations are rejected,
    /// as is an attempt timeout under one millisecond.
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        Ok(RetryPolicy {
            max_attempts: self.max_attempts,
            attempt_timeout: secs_to_timeout("attempt_timeout_secs", self.attempt_timeout_secs)?,
            retry_delay: secs_to_duration("retry_delay_secs", self.retry_delay_secs)?,
        })
    }
}

/// Parse a seconds value as a duration, naming the offending setting on error.
pub fn secs_to_duration(name: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).with_context(|| format!("invalid {}: {}", name, secs))
}

/// Like `secs_to_duration`, but the result must be at least one millisecond.
pub fn secs_to_timeout(name: &str, secs: f64) -> Result<Duration> {
    let d = secs_to_duration(name, secs)?;
    if d < Duration::from_millis(1) {
        anyhow::bail!("invalid {}: {} (must be at least 0.001)", name, secs);
    }
    Ok(d)
}

/// Global configuration loaded from `~/.config/relfetch/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelfetchConfig {
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Optional User-Agent header sent with every attempt.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl RelfetchConfig {
    /// Effective retry policy (configured section or defaults).
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        match &self.retry {
            Some(r) => r.to_policy(),
            None => Ok(RetryPolicy::default()),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("relfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RelfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RelfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<RelfetchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: RelfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
