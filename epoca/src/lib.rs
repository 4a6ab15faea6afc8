//! Epoca exports prediction-market rounds enriched with pre-round price candles.
//!
//! Overview
//! - A [`WindowPlan`] expands a `DD-MM-YYYY` date range into three UTC windows per day.
//! - For every window the round provider is queried once, every round is enriched
//!   concurrently with its lookback candles, and the result is written as one JSON
//!   artifact through an [`ArtifactSink`].
//! - Windows run strictly one after another, so outstanding requests never exceed
//!   the number of rounds in a single window.
//!
//! Failure handling
//! - Any error inside a window (transport, timeout, shape, export) abandons that
//!   window only; it is logged and recorded in the [`RunReport`] and the run moves on.
//! - Nothing is retried and no partial artifact is written.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use epoca::{DirectorySink, Epoca, WindowPlan};
//! use epoca_binance::BinanceConnector;
//! use epoca_subgraph::SubgraphConnector;
//!
//! let epoca = Epoca::builder()
//!     .with_connector(Arc::new(SubgraphConnector::gateway(&api_key)?))
//!     .with_connector(Arc::new(BinanceConnector::new_default()?))
//!     .sink(Arc::new(DirectorySink::new("out")))
//!     .build()?;
//!
//! let report = epoca.run(&WindowPlan::parse("01-03-2025", "02-03-2025")?).await;
//! for (window, err) in report.failures() {
//!     eprintln!("{window}: {err}");
//! }
//! ```
#![warn(missing_docs)]

mod core;
mod enrich;
mod pipeline;
mod sink;

pub use crate::core::{Epoca, EpocaBuilder};
pub use sink::DirectorySink;

pub use epoca_core::connector::{ArtifactSink, CandleProvider, EpocaConnector, RoundProvider};
pub use epoca_core::{
    Bucket, Candle, CandleRequest, EmptyWindowPolicy, EnrichedRound, EpocaConfig, EpocaError,
    EpochRange, LookbackConfig, Round, RunReport, Window, WindowOutcome, WindowPlan,
    WindowStatus,
};
