//! Prediction-market round records as served by the round registry.

use serde::{Deserialize, Serialize};

use crate::Candle;

/// One prediction-market round.
///
/// Field order matches the registry schema and is preserved on serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// Sequence identifier (string-encoded integer, unique and monotonic).
    pub epoch: String,
    /// Winning side once the round has been settled.
    pub position: Option<String>,
    /// Whether the round failed to settle.
    pub failed: Option<bool>,
    /// Round start, epoch seconds.
    #[serde(with = "epoch_seconds")]
    pub start_at: i64,
    /// Round close, epoch seconds.
    #[serde(with = "epoch_seconds")]
    pub close_at: i64,
    /// Total number of bets.
    pub total_bets: String,
    /// Total amount wagered.
    pub total_amount: String,
    /// Number of bull bets.
    pub bull_bets: String,
    /// Amount wagered on bull.
    pub bull_amount: String,
    /// Number of bear bets.
    pub bear_bets: String,
    /// Amount wagered on bear.
    pub bear_amount: String,
}

impl Round {
    /// Numeric sequence identifier, if `epoch` is a valid integer.
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.epoch.parse().ok()
    }

    /// Round start in epoch milliseconds.
    #[must_use]
    pub const fn start_at_ms(&self) -> i64 {
        self.start_at.saturating_mul(1000)
    }

    /// Attach the lookback candles, producing the exported record.
    #[must_use]
    pub fn enrich(self, candles: Vec<Candle>) -> EnrichedRound {
        EnrichedRound {
            round: self,
            candles,
        }
    }
}

/// A [`Round`] together with the candles that precede its start.
///
/// Every candle satisfies `open_time < round.start_at_ms()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRound {
    /// The source round, flattened into the same JSON object.
    #[serde(flatten)]
    pub round: Round,
    /// Lookback candles in ascending open time.
    #[serde(rename = "dataBinance")]
    pub candles: Vec<Candle>,
}

// The registry encodes BigInt fields as strings; accept both forms, always emit numbers.
mod epoch_seconds {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(v: &i64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(*v)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        match Raw::deserialize(d)? {
            Raw::Int(v) => Ok(v),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid epoch seconds: {s:?}"))),
        }
    }
}
