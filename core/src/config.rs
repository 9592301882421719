//! Settings for the network transport.
//!
//! Defaults suit most callers; `from_env` lets a deployment override them
//! without code changes. Values can also be deserialized from any serde
//! format, with missing fields falling back to the defaults.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_MAX_REDIRECTS: u32 = 10;
const DEFAULT_MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Bound on a whole exchange, in milliseconds. `None` disables it.
    pub timeout_ms: Option<u64>,
    pub max_redirects: u32,
    /// Bodies larger than this fail the exchange.
    pub max_body_bytes: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: Some(DEFAULT_TIMEOUT_MS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl TransportConfig {
    /// Defaults overridden by `REQKIT_TIMEOUT_MS` (0 disables the timeout),
    /// `REQKIT_MAX_REDIRECTS` and `REQKIT_MAX_BODY_BYTES`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(ms) = parse_var(&lookup, "REQKIT_TIMEOUT_MS")? {
            config.timeout_ms = (ms > 0).then_some(ms);
        }
        if let Some(max) = parse_var(&lookup, "REQKIT_MAX_REDIRECTS")? {
            config.max_redirects = max;
        }
        if let Some(max) = parse_var(&lookup, "REQKIT_MAX_BODY_BYTES")? {
            config.max_body_bytes = max;
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}
