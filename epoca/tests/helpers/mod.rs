// Re-export helpers so tests can `use crate::helpers::*;`
pub mod scripted;

#[allow(unused_imports)]
pub use scripted::{Scripted, lookback_candles};

use epoca_core::{EnrichedRound, Round};

/// 2025-03-01T00:00:00Z.
pub const MAR_01: i64 = 1_740_787_200;
pub const HOUR: i64 = 3600;

/// Artifact names for 01-03-2025 with the default label.
#[allow(dead_code)]
pub const MAR_01_ARTIFACTS: [&str; 3] = [
    "DataBnb01032025-00-08.json",
    "DataBnb01032025-08-16.json",
    "DataBnb01032025-16-23.json",
];

/// Build a round with a numeric sequence id, starting at `start_at`.
pub fn round(seq: u64, start_at: i64) -> Round {
    Round {
        epoch: seq.to_string(),
        position: Some("Bull".to_string()),
        failed: Some(false),
        start_at,
        close_at: start_at + 300,
        total_bets: "3".to_string(),
        total_amount: "1.5".to_string(),
        bull_bets: "2".to_string(),
        bull_amount: "1.0".to_string(),
        bear_bets: "1".to_string(),
        bear_amount: "0.5".to_string(),
    }
}

/// `count` five-minute rounds starting at `first_start`, sequence ids from `first_seq`.
#[allow(dead_code)]
pub fn rounds_from(first_seq: u64, first_start: i64, count: u64) -> Vec<Round> {
    (0..count)
        .map(|i| round(first_seq + i, first_start + 300 * i64::try_from(i).unwrap()))
        .collect()
}

/// Decode an artifact written by the pipeline.
#[allow(dead_code)]
pub fn decode(bytes: &[u8]) -> Vec<EnrichedRound> {
    serde_json::from_slice(bytes).expect("artifact is a JSON array of enriched rounds")
}
