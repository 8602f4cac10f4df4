//! Configuration parsing for the tape service.
//!
//! The whole service runs from a single optional JSON config file. Every
//! field has a built-in default, so an empty file (or no file at all) yields
//! a working demo configuration.
//!
//! # Example config
//!
//! ```json
//! {
//!   "listen_addr": "0.0.0.0:5000",
//!   "tick_interval_ms": 3000,
//!   "drift": 0.00001,
//!   "volatility": 0.001,
//!   "alert_timeout_ms": 1500,
//!   "alerts_path": "/var/lib/tape/alerts.json",
//!   "instruments": [
//!     { "symbol": "btc", "value": 60000.0, "change": 2.04 }
//!   ]
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::TapeError;
use crate::types::InstrumentSpec;
use crate::types::instrument::default_instruments;

/// Default WebSocket listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";

/// Default tick period in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 3000;

/// Default per-tick drift of the price model.
pub const DEFAULT_DRIFT: f64 = 1e-5;

/// Default per-tick volatility of the price model.
pub const DEFAULT_VOLATILITY: f64 = 1e-3;

/// Default bound on a single alert store read, in milliseconds.
pub const DEFAULT_ALERT_TIMEOUT_MS: u64 = 1500;

/// Top-level application config, deserialized from a JSON file.
///
/// All fields are optional; use the `effective_*()` accessors to get values
/// with defaults applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// WebSocket listen address (`host:port`).
    pub listen_addr: Option<String>,

    /// Tick period in milliseconds.
    pub tick_interval_ms: Option<u64>,

    /// Per-tick drift of the price model.
    pub drift: Option<f64>,

    /// Per-tick volatility of the price model.
    pub volatility: Option<f64>,

    /// Bound on a single alert store read, in milliseconds.
    pub alert_timeout_ms: Option<u64>,

    /// Path to a JSON file holding the alert list. When unset, the service
    /// runs with an empty in-memory alert store.
    pub alerts_path: Option<String>,

    /// Instrument seed set override. When unset, the built-in set is used.
    pub instruments: Option<Vec<InstrumentSpec>>,
}

impl AppConfig {
    /// Returns the listen address, defaulting to [`DEFAULT_LISTEN_ADDR`].
    pub fn effective_listen_addr(&self) -> String {
        self.listen_addr.clone().unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
    }

    /// Returns the tick period, defaulting to [`DEFAULT_TICK_INTERVAL_MS`].
    pub fn effective_tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.unwrap_or(DEFAULT_TICK_INTERVAL_MS))
    }

    /// Returns the model drift, defaulting to [`DEFAULT_DRIFT`].
    pub fn effective_drift(&self) -> f64 {
        self.drift.unwrap_or(DEFAULT_DRIFT)
    }

    /// Returns the model volatility, defaulting to [`DEFAULT_VOLATILITY`].
    pub fn effective_volatility(&self) -> f64 {
        self.volatility.unwrap_or(DEFAULT_VOLATILITY)
    }

    /// Returns the alert read bound, defaulting to [`DEFAULT_ALERT_TIMEOUT_MS`].
    pub fn effective_alert_timeout(&self) -> Duration {
        Duration::from_millis(self.alert_timeout_ms.unwrap_or(DEFAULT_ALERT_TIMEOUT_MS))
    }

    /// Returns the instrument seed set, defaulting to the built-in list.
    pub fn effective_instruments(&self) -> Vec<InstrumentSpec> {
        self.instruments.clone().unwrap_or_else(default_instruments)
    }

    /// Validate the config.
    ///
    /// The price model is a multiplicative perturbation of the seed value, so
    /// every seed must be strictly positive; symbols must also be unique
    /// (case-insensitively) since they form the table key set.
    pub fn validate(&self) -> Result<(), TapeError> {
        if let Some(instruments) = &self.instruments {
            if instruments.is_empty() {
                return Err(TapeError::Config("instrument list is empty".to_string()));
            }
            let mut seen = std::collections::HashSet::new();
            for spec in instruments {
                if !(spec.value > 0.0) {
                    return Err(TapeError::Config(format!(
                        "instrument '{}' has non-positive seed value {}",
                        spec.symbol, spec.value
                    )));
                }
                if !seen.insert(spec.symbol.to_lowercase()) {
                    return Err(TapeError::Config(format!("duplicate instrument '{}'", spec.symbol)));
                }
            }
        }
        Ok(())
    }
}

/// Load, parse, and validate a JSON config file.
pub fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_yields_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.effective_listen_addr(), DEFAULT_LISTEN_ADDR);
        assert_eq!(config.effective_tick_interval(), Duration::from_millis(3000));
        assert_eq!(config.effective_drift(), DEFAULT_DRIFT);
        assert_eq!(config.effective_volatility(), DEFAULT_VOLATILITY);
        assert!(config.alerts_path.is_none());
        assert!(!config.effective_instruments().is_empty()); // built-in seed set
    }

    #[test]
    fn full_config_parses() {
        let raw = r#"{
            "listen_addr": "127.0.0.1:9000",
            "tick_interval_ms": 250,
            "drift": 0.0001,
            "volatility": 0.01,
            "alert_timeout_ms": 500,
            "alerts_path": "/tmp/alerts.json",
            "instruments": [
                { "symbol": "btc", "value": 60000.0, "change": 2.04 },
                { "symbol": "eth", "value": 3500.0 }
            ]
        }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.effective_listen_addr(), "127.0.0.1:9000");
        assert_eq!(config.effective_tick_interval(), Duration::from_millis(250));
        assert_eq!(config.effective_alert_timeout(), Duration::from_millis(500));

        let instruments = config.effective_instruments();
        assert_eq!(instruments.len(), 2);
        assert_eq!(instruments[1].symbol, "eth");
        assert_eq!(instruments[1].change, 0.0); // change defaults when omitted
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_positive_seed_rejected() {
        let raw = r#"{ "instruments": [ { "symbol": "btc", "value": 0.0 } ] }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn duplicate_symbols_rejected() {
        let raw = r#"{ "instruments": [
            { "symbol": "btc", "value": 1.0 },
            { "symbol": "BTC", "value": 2.0 }
        ] }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert!(config.validate().is_err()); // case-insensitive duplicate
    }
}
