//! Epoca-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod candle;
mod config;
mod connector;
mod reports;
mod round;
mod window;

/// Unified error type shared by every crate in the workspace.
pub mod error;

pub use candle::Candle;
pub use config::{EmptyWindowPolicy, EpocaConfig, LookbackConfig};
pub use connector::ConnectorKey;
pub use error::EpocaError;
pub use reports::{RunReport, WindowOutcome, WindowStatus};
pub use round::{EnrichedRound, Round};
pub use window::{Bucket, EpochRange, Window};
