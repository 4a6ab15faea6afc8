//! epoca-binance
//!
//! Connector that implements `CandleProvider` on top of the Binance spot
//! `GET /api/v3/klines` endpoint. Rows are decoded with
//! [`epoca_core::parse_klines`], so schema drift surfaces as a shape error.
#![warn(missing_docs)]

use async_trait::async_trait;
use epoca_core::connector::{CandleProvider, ConnectorKey, EpocaConnector};
use epoca_core::{Candle, CandleRequest, EpocaError, parse_klines};
use url::Url;

/// Public connector type for Binance klines.
#[derive(Debug, Clone)]
pub struct BinanceConnector {
    http: reqwest::Client,
    klines: Url,
}

impl BinanceConnector {
    /// Static connector key.
    pub const KEY: ConnectorKey = ConnectorKey::new("epoca-binance");

    /// Production REST origin.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.binance.com";

    const KLINES_PATH: &'static str = "/api/v3/klines";

    /// Build against the production API.
    ///
    /// # Errors
    /// Returns `Other` if the HTTP client cannot be built.
    pub fn new_default() -> Result<Self, EpocaError> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    /// Build against another origin (a mirror or a local test server).
    ///
    /// # Errors
    /// Returns `InvalidArg` if `base` is not an absolute http(s) URL and `Other` if
    /// the HTTP client cannot be built.
    pub fn with_base_url(base: &str) -> Result<Self, EpocaError> {
        let base = Url::parse(base)
            .map_err(|e| EpocaError::InvalidArg(format!("invalid market-data url: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(EpocaError::InvalidArg(format!(
                "market-data url must be http(s), got {}",
                base.scheme()
            )));
        }
        let klines = base
            .join(Self::KLINES_PATH)
            .map_err(|e| EpocaError::InvalidArg(format!("invalid market-data url: {e}")))?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("epoca/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EpocaError::Other(e.to_string()))?;
        Ok(Self { http, klines })
    }

    /// Replace the HTTP client, e.g. to share a connection pool.
    #[must_use]
    pub fn with_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Fully resolved klines endpoint.
    #[must_use]
    pub const fn klines_url(&self) -> &Url {
        &self.klines
    }

    fn transport(msg: impl std::fmt::Display) -> EpocaError {
        EpocaError::connector(Self::KEY, msg.to_string())
    }
}

impl EpocaConnector for BinanceConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Binance"
    }

    fn as_candle_provider(&self) -> Option<&dyn CandleProvider> {
        Some(self as &dyn CandleProvider)
    }
}

#[async_trait]
impl CandleProvider for BinanceConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "epoca_binance::candles",
            skip(self, req),
            fields(symbol = %req.symbol, interval = %req.interval, start_ms = req.start_ms, end_ms = req.end_ms),
        )
    )]
    async fn candles(&self, req: &CandleRequest) -> Result<Vec<Candle>, EpocaError> {
        let start = req.start_ms.to_string();
        let end = req.end_ms.to_string();
        let limit = req.limit.to_string();
        let resp = self
            .http
            .get(self.klines.clone())
            .query(&[
                ("symbol", req.symbol.as_str()),
                ("interval", req.interval.as_str()),
                ("startTime", start.as_str()),
                ("endTime", end.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Self::transport(format!("request: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            // Error bodies are small JSON objects such as {"code":-1121,"msg":"Invalid symbol."}.
            let detail = resp.text().await.unwrap_or_default();
            let detail: String = detail.chars().take(200).collect();
            return Err(Self::transport(format!("status {status}: {detail}")));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Self::transport(format!("read body: {e}")))?;
        let candles = parse_klines(&bytes)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(candles = candles.len(), "fetched klines");
        Ok(candles)
    }
}
