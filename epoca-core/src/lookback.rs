//! Market-data request derived from a round's start time.

use epoca_types::{EpocaError, LookbackConfig, Round};

/// Parameters of one market-data query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandleRequest {
    /// Instrument symbol, e.g. "BNBUSDT".
    pub symbol: String,
    /// Candle interval label, e.g. "5m".
    pub interval: String,
    /// Lower bound, epoch milliseconds.
    pub start_ms: i64,
    /// Upper bound, epoch milliseconds.
    pub end_ms: i64,
    /// Maximum number of candles.
    pub limit: u32,
}

impl CandleRequest {
    /// Request covering `[start_at - lead, start_at - gap]` for `round`.
    ///
    /// With the default configuration this is a 2h55m span ending five minutes
    /// before the round opens.
    #[must_use]
    pub fn for_round(round: &Round, cfg: &LookbackConfig) -> Self {
        Self {
            symbol: cfg.symbol.clone(),
            interval: cfg.interval.clone(),
            start_ms: round.start_at.saturating_sub(cfg.lead_secs).saturating_mul(1000),
            end_ms: round.start_at.saturating_sub(cfg.gap_secs).saturating_mul(1000),
            limit: cfg.limit,
        }
    }

    /// Covered span in milliseconds.
    #[must_use]
    pub const fn span_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

/// Check that a lookback configuration describes a non-empty window before the round.
///
/// # Errors
/// Returns `InvalidArg` when the gap is negative, the lead does not exceed the gap,
/// the limit is zero, or the symbol/interval is blank.
pub fn validate(cfg: &LookbackConfig) -> Result<(), EpocaError> {
    if cfg.gap_secs < 0 {
        return Err(EpocaError::InvalidArg(format!(
            "lookback gap must be non-negative, got {}s",
            cfg.gap_secs
        )));
    }
    if cfg.lead_secs <= cfg.gap_secs {
        return Err(EpocaError::InvalidArg(format!(
            "lookback lead ({}s) must exceed gap ({}s)",
            cfg.lead_secs, cfg.gap_secs
        )));
    }
    if cfg.limit == 0 {
        return Err(EpocaError::InvalidArg("candle limit must be positive".into()));
    }
    if cfg.symbol.trim().is_empty() || cfg.interval.trim().is_empty() {
        return Err(EpocaError::InvalidArg(
            "lookback symbol and interval must be set".into(),
        ));
    }
    Ok(())
}
