use async_trait::async_trait;

use crate::lookback::CandleRequest;
pub use epoca_types::ConnectorKey;
use epoca_types::{Candle, EpocaError, EpochRange, Round};

/// Focused role trait for connectors that serve round records.
#[async_trait]
pub trait RoundProvider: Send + Sync {
    /// Fetch every round whose `startAt` lies in `range` (inclusive on both ends),
    /// ordered ascending by sequence identifier.
    async fn rounds(&self, range: EpochRange) -> Result<Vec<Round>, EpocaError>;
}

/// Focused role trait for connectors that serve price candles.
#[async_trait]
pub trait CandleProvider: Send + Sync {
    /// Fetch candles for the instrument, interval and bounds in `req`,
    /// ordered ascending by open time.
    async fn candles(&self, req: &CandleRequest) -> Result<Vec<Candle>, EpocaError>;
}

/// Destination for serialized window artifacts.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// A stable identifier used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Persist one artifact under `name`.
    async fn emit(&self, name: &str, bytes: Vec<u8>) -> Result<(), EpocaError>;
}

/// Public interface implemented by every data source.
///
/// Capabilities are advertised by returning a trait object from the matching
/// `as_*_provider` accessor; the defaults advertise nothing.
pub trait EpocaConnector: Send + Sync {
    /// A stable identifier (e.g., "epoca-subgraph", "epoca-binance").
    fn name(&self) -> &'static str;

    /// Canonical connector key constructed from the static name.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Advertise round capability by returning a usable trait object reference when supported.
    fn as_round_provider(&self) -> Option<&dyn RoundProvider> {
        None
    }

    /// Advertise candle capability by returning a usable trait object reference when supported.
    fn as_candle_provider(&self) -> Option<&dyn CandleProvider> {
        None
    }
}
