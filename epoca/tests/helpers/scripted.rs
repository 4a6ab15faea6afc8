use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use epoca_core::connector::{CandleProvider, EpocaConnector, RoundProvider};
use epoca_core::{Candle, CandleRequest, EpocaError, EpochRange, Round};
use epoca_mock::MockConnector;

type CandleFn = Arc<dyn Fn(&CandleRequest) -> Result<Vec<Candle>, EpocaError> + Send + Sync>;
type DelayFn = Arc<dyn Fn(&CandleRequest) -> Duration + Send + Sync>;

/// Connector whose responses are fixed by the test.
///
/// Rounds are served from a fixed list filtered by the requested range (unless
/// `leaky` is set). Candles come from a closure, optionally after a per-request delay.
pub struct Scripted {
    name: &'static str,
    rounds: Option<Vec<Round>>,
    leaky: bool,
    round_delay: Option<Duration>,
    candles: Option<CandleFn>,
    candle_delay: Option<DelayFn>,
}

#[allow(dead_code)]
impl Scripted {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            rounds: None,
            leaky: false,
            round_delay: None,
            candles: None,
            candle_delay: None,
        }
    }

    pub fn with_rounds(mut self, rounds: Vec<Round>) -> Self {
        self.rounds = Some(rounds);
        self
    }

    /// Return every scripted round regardless of the requested range.
    pub fn leaky(mut self) -> Self {
        self.leaky = true;
        self
    }

    pub fn with_round_delay(mut self, d: Duration) -> Self {
        self.round_delay = Some(d);
        self
    }

    pub fn with_candles(
        mut self,
        f: impl Fn(&CandleRequest) -> Result<Vec<Candle>, EpocaError> + Send + Sync + 'static,
    ) -> Self {
        self.candles = Some(Arc::new(f));
        self
    }

    pub fn with_candle_delay(
        mut self,
        f: impl Fn(&CandleRequest) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.candle_delay = Some(Arc::new(f));
        self
    }
}

impl EpocaConnector for Scripted {
    fn name(&self) -> &'static str {
        self.name
    }

    fn as_round_provider(&self) -> Option<&dyn RoundProvider> {
        self.rounds.as_ref().map(|_| self as &dyn RoundProvider)
    }

    fn as_candle_provider(&self) -> Option<&dyn CandleProvider> {
        self.candles.as_ref().map(|_| self as &dyn CandleProvider)
    }
}

#[async_trait]
impl RoundProvider for Scripted {
    async fn rounds(&self, range: EpochRange) -> Result<Vec<Round>, EpocaError> {
        if let Some(d) = self.round_delay {
            tokio::time::sleep(d).await;
        }
        let all = self.rounds.clone().unwrap_or_default();
        if self.leaky {
            return Ok(all);
        }
        Ok(all
            .into_iter()
            .filter(|r| range.contains(r.start_at))
            .collect())
    }
}

#[async_trait]
impl CandleProvider for Scripted {
    async fn candles(&self, req: &CandleRequest) -> Result<Vec<Candle>, EpocaError> {
        if let Some(delay) = &self.candle_delay {
            tokio::time::sleep(delay(req)).await;
        }
        match &self.candles {
            Some(f) => f(req),
            None => Err(EpocaError::unsupported("candles")),
        }
    }
}

/// Five-minute candles opening inside `[start_ms, end_ms]`, capped at `limit`.
pub fn lookback_candles(req: &CandleRequest) -> Result<Vec<Candle>, EpocaError> {
    let step = 300_000;
    let first = (req.start_ms + step - 1).div_euclid(step) * step;
    Ok((0..)
        .map(|i| first + i * step)
        .take_while(|t| *t <= req.end_ms)
        .take(req.limit as usize)
        .map(|t| MockConnector::candle_at(t, step))
        .collect())
}
