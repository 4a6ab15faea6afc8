//! epoca-core
//!
//! Core traits and pure helpers shared across the epoca workspace.
//!
//! - `connector`: the `EpocaConnector` trait and the round/candle/sink capability traits.
//! - `planner`: expansion of a calendar range into sub-day query windows.
//! - `lookback`: derivation of the market-data request for a round.
//! - `kline`: validated decoding of positional market-data rows.
//! - `export`: artifact naming and JSON encoding.
#![warn(missing_docs)]

/// Connector capability traits and the primary `EpocaConnector` interface.
pub mod connector;
pub mod export;
pub mod kline;
pub mod lookback;
pub mod planner;

pub use connector::{ArtifactSink, CandleProvider, EpocaConnector, RoundProvider};
pub use epoca_types::*;
pub use export::{artifact_name, encode_rounds};
pub use kline::{candle_from_row, parse_klines};
pub use lookback::CandleRequest;
pub use planner::{WindowPlan, Windows, parse_day};
