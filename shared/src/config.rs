//! Bridge configuration, passed by the host as a JSON document at startup.
//!
//! Every field has a default, so `{}` (or an empty string) is a valid
//! configuration.

use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::traits::RemainingThresholds;

/// Configuration for the navigation bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    /// Tag under which log lines appear in logcat
    pub log_tag: String,
    /// Maximum log level (`error`, `warn`, `info`, `debug`, `trace`, `off`)
    pub log_level: String,
    /// Timeout for remote map style downloads in milliseconds
    pub style_fetch_timeout_ms: u64,
    /// Minimum change in remaining seconds before a callback fires
    pub remaining_time_threshold_seconds: i32,
    /// Minimum change in remaining meters before a callback fires
    pub remaining_distance_threshold_meters: i32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_tag: "NavSdkBridge".to_string(),
            log_level: "info".to_string(),
            style_fetch_timeout_ms: 10_000,
            remaining_time_threshold_seconds: 0,
            remaining_distance_threshold_meters: 0,
        }
    }
}

impl BridgeConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }

    /// Parsed log level, `Info` when unrecognized
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn style_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.style_fetch_timeout_ms)
    }

    pub fn thresholds(&self) -> RemainingThresholds {
        RemainingThresholds {
            seconds: self.remaining_time_threshold_seconds,
            meters: self.remaining_distance_threshold_meters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_config_default() {
        let config = BridgeConfig::default();
        assert_eq!(config.log_tag, "NavSdkBridge");
        assert_eq!(config.level_filter(), LevelFilter::Info);
        assert_eq!(config.style_fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.thresholds(), RemainingThresholds::default());
    }

    #[test]
    fn test_partial_json() {
        let config = BridgeConfig::from_json(r#"{"logLevel":"debug","remainingTimeThresholdSeconds":30}"#).unwrap();
        assert_eq!(config.level_filter(), LevelFilter::Debug);
        assert_eq!(config.thresholds().seconds, 30);
        assert_eq!(config.log_tag, "NavSdkBridge");

        assert_eq!(BridgeConfig::from_json("  ").unwrap(), BridgeConfig::default());
        assert!(BridgeConfig::from_json("{").is_err());
    }

    #[test]
    fn test_unknown_level_falls_back() {
        let config = BridgeConfig {
            log_level: "chatty".into(),
            ..BridgeConfig::default()
        };
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }
}
