//! Runtime and actuation configuration.
//!
//! Both structs read optional overrides from the process environment; unset
//! or unparsable variables keep their defaults.

use std::env;
use std::time::Duration;

use agent_core::Size;

use crate::api::{Result, RuntimeError};

/// Channel sizes, tick throttle and display geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    /// Frames arriving sooner than this after the last evaluated frame are
    /// dropped.
    pub min_tick_interval: Duration,
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    /// Pending actuation jobs; jobs beyond this are dropped, never awaited.
    pub actuation_buffer_size: usize,
    /// Per-command deadline at the actuation boundary.
    pub actuation_timeout: Duration,
    /// Intrinsic video size, until frames report their own.
    pub source: Option<Size>,
    /// Display container size used for letterbox mapping.
    pub container: Option<Size>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            min_tick_interval: Duration::from_millis(200),
            command_buffer_size: 32,
            event_buffer_size: 100,
            actuation_buffer_size: 16,
            actuation_timeout: Duration::from_millis(2_000),
            source: None,
            container: None,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `AGENT_MIN_TICK_MS` - Minimum interval between evaluated frames (default: 200)
    /// - `AGENT_COMMAND_BUFFER` - Decision worker queue size (default: 32)
    /// - `AGENT_EVENT_BUFFER` - Per-topic event capacity (default: 100)
    /// - `AGENT_ACTUATION_BUFFER` - Pending actuation jobs (default: 16)
    /// - `AGENT_ACTUATION_TIMEOUT_MS` - Per-command timeout (default: 2000)
    /// - `AGENT_SOURCE_WIDTH` / `AGENT_SOURCE_HEIGHT` - Video source size
    /// - `AGENT_CONTAINER_WIDTH` / `AGENT_CONTAINER_HEIGHT` - Display container size
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("AGENT_MIN_TICK_MS") {
            config.min_tick_interval = Duration::from_millis(ms);
        }
        if let Some(size) = read_env::<usize>("AGENT_COMMAND_BUFFER") {
            config.command_buffer_size = size.max(1);
        }
        if let Some(size) = read_env::<usize>("AGENT_EVENT_BUFFER") {
            config.event_buffer_size = size.max(1);
        }
        if let Some(size) = read_env::<usize>("AGENT_ACTUATION_BUFFER") {
            config.actuation_buffer_size = size.max(1);
        }
        if let Some(ms) = read_env::<u64>("AGENT_ACTUATION_TIMEOUT_MS") {
            config.actuation_timeout = Duration::from_millis(ms.max(1));
        }

        config.source = read_size("AGENT_SOURCE_WIDTH", "AGENT_SOURCE_HEIGHT").or(config.source);
        config.container =
            read_size("AGENT_CONTAINER_WIDTH", "AGENT_CONTAINER_HEIGHT").or(config.container);

        config
    }
}

/// Command sink settings. Owned by the actuation worker.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ActuationConfig {
    pub endpoint: String,
    /// When false, commands are dropped at the boundary (and logged if
    /// `log_commands` is set).
    pub enabled: bool,
    pub log_commands: bool,
}

impl ActuationConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "http://127.0.0.1:8765/command";

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ACTUATION_ENDPOINT` - Command sink URL (default: `http://127.0.0.1:8765/command`)
    /// - `ACTUATION_ENABLED` - Send commands to the sink (default: false)
    /// - `ACTUATION_LOG` - Log every command (default: true)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(endpoint) = env::var("ACTUATION_ENDPOINT")
            && !endpoint.trim().is_empty()
        {
            config.endpoint = endpoint.trim().to_owned();
        }
        if let Some(enabled) = read_env_bool("ACTUATION_ENABLED") {
            config.enabled = enabled;
        }
        if let Some(log) = read_env_bool("ACTUATION_LOG") {
            config.log_commands = log;
        }

        config
    }

    /// Rejects endpoints that are not absolute http(s) URLs.
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            RuntimeError::InvalidConfig(format!("invalid endpoint {:?}: {e}", self.endpoint))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(RuntimeError::InvalidConfig(format!(
                "unsupported endpoint scheme {scheme:?}"
            ))),
        }
    }
}

impl Default for ActuationConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_owned(),
            enabled: false,
            log_commands: true,
        }
    }
}

/// Partial actuation update; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ActuationConfigPatch {
    pub endpoint: Option<String>,
    pub enabled: Option<bool>,
    pub log_commands: Option<bool>,
}

impl ActuationConfigPatch {
    pub fn apply(self, config: &mut ActuationConfig) {
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        if let Some(log) = self.log_commands {
            config.log_commands = log;
        }
    }

    /// The configuration this patch would produce over `current`.
    pub fn applied_to(&self, current: &ActuationConfig) -> ActuationConfig {
        let mut next = current.clone();
        self.clone().apply(&mut next);
        next
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn read_size(width_key: &str, height_key: &str) -> Option<Size> {
    let size = Size::new(read_env(width_key)?, read_env(height_key)?);
    (!size.is_degenerate()).then_some(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_keeps_unset_fields() {
        let mut config = ActuationConfig::default();
        ActuationConfigPatch {
            enabled: Some(true),
            ..ActuationConfigPatch::default()
        }
        .apply(&mut config);

        assert!(config.enabled);
        assert!(config.log_commands);
        assert_eq!(config.endpoint, ActuationConfig::DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_default_endpoint_is_valid() {
        assert!(ActuationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_endpoints() {
        let relative = ActuationConfig {
            endpoint: "/command".to_owned(),
            ..ActuationConfig::default()
        };
        let ftp = ActuationConfig {
            endpoint: "ftp://host/command".to_owned(),
            ..ActuationConfig::default()
        };

        assert!(matches!(relative.validate(), Err(RuntimeError::InvalidConfig(_))));
        assert!(matches!(ftp.validate(), Err(RuntimeError::InvalidConfig(_))));
    }

    #[test]
    fn test_default_throttle_caps_five_per_second() {
        assert_eq!(
            RuntimeConfig::default().min_tick_interval,
            Duration::from_millis(200)
        );
    }
}
