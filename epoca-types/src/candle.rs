use serde::{Deserialize, Serialize};

/// One fixed-duration price bar from the market-data API.
///
/// Price and volume fields are decimal strings kept exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    /// Bar open, epoch milliseconds.
    pub open_time: i64,
    /// Open price.
    pub open: String,
    /// High price.
    pub high: String,
    /// Low price.
    pub low: String,
    /// Close price.
    pub close: String,
    /// Base-asset volume.
    pub volume: String,
    /// Bar close, epoch milliseconds.
    pub close_time: i64,
    /// Quote-asset volume.
    pub quote_asset_volume: String,
    /// Number of trades in the bar.
    pub number_of_trades: u64,
    /// Taker buy base-asset volume.
    pub taker_buy_base_volume: String,
    /// Taker buy quote-asset volume.
    pub taker_buy_quote_volume: String,
    /// Unused trailing field.
    pub ignore: String,
}
