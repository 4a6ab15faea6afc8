//! Configuration types shared across the orchestrator and connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What to do with a window whose round query returned no rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EmptyWindowPolicy {
    /// Write an artifact containing an empty JSON array.
    #[default]
    Emit,
    /// Write nothing and report the window as skipped.
    Skip,
}

/// Market-data lookback parameters applied to every round.
///
/// The defaults request 5-minute candles from three hours before the round start
/// up to five minutes before it, capped at 36 bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookbackConfig {
    /// Instrument symbol sent to the market-data API.
    pub symbol: String,
    /// Candle interval label, e.g. "5m".
    pub interval: String,
    /// Seconds before the round start at which the lookback begins.
    pub lead_secs: i64,
    /// Seconds before the round start at which the lookback ends.
    pub gap_secs: i64,
    /// Maximum number of candles requested.
    pub limit: u32,
}

impl Default for LookbackConfig {
    fn default() -> Self {
        Self {
            symbol: "BNBUSDT".to_string(),
            interval: "5m".to_string(),
            lead_secs: 3 * 3600,
            gap_secs: 5 * 60,
            limit: 36,
        }
    }
}

/// Global configuration for the `Epoca` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpocaConfig {
    /// Lookback window and market-data query parameters.
    pub lookback: LookbackConfig,
    /// Label inserted into artifact names (`Data<label><DDMMYYYY>-..`).
    pub artifact_label: String,
    /// Handling of windows without rounds.
    pub empty_windows: EmptyWindowPolicy,
    /// Timeout for individual provider requests.
    pub provider_timeout: Duration,
}

impl Default for EpocaConfig {
    fn default() -> Self {
        Self {
            lookback: LookbackConfig::default(),
            artifact_label: "Bnb".to_string(),
            empty_windows: EmptyWindowPolicy::default(),
            provider_timeout: Duration::from_secs(30),
        }
    }
}
