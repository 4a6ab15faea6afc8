//! Deterministic stand-ins for the remote round registry, the market-data API
//! and the artifact destination.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use epoca_core::connector::{CandleProvider, EpocaConnector, RoundProvider};
use epoca_core::{Candle, CandleRequest, EpocaError, EpochRange, Round};
use tokio::sync::Mutex;

mod sink;

pub use sink::MemorySink;

/// First round start produced by the mock (2020-09-13T12:25:00Z, on the 5-minute grid).
pub const GENESIS: i64 = 1_599_999_900;

/// Mock connector serving both rounds and candles from pure functions of time.
///
/// Rounds start every `round_interval` seconds from [`GENESIS`]; candles are
/// aligned to the requested interval and priced from their open time.
pub struct MockConnector {
    round_interval: i64,
    candle_latency: Option<Duration>,
    failing_ranges: HashSet<i64>,
    failing_epochs: HashSet<i64>,
    candle_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: Mutex<Vec<CandleRequest>>,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Five-minute rounds, no latency, no failures.
    #[must_use]
    pub fn new() -> Self {
        Self {
            round_interval: 300,
            candle_latency: None,
            failing_ranges: HashSet::new(),
            failing_epochs: HashSet::new(),
            candle_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Spacing between consecutive round starts. Values below one second are raised to one.
    #[must_use]
    pub fn round_interval(mut self, secs: i64) -> Self {
        self.round_interval = secs.max(1);
        self
    }

    /// Delay every candle response, making the fan-out observable.
    #[must_use]
    pub const fn candle_latency(mut self, latency: Duration) -> Self {
        self.candle_latency = Some(latency);
        self
    }

    /// Fail round queries whose range starts at `start` (epoch seconds).
    #[must_use]
    pub fn fail_rounds_from(mut self, start: i64) -> Self {
        self.failing_ranges.insert(start);
        self
    }

    /// Fail the candle query of the round with sequence identifier `epoch`.
    ///
    /// The round behind a query is taken to be the first round starting after the
    /// query's upper bound, which holds for any lookback gap up to one round interval.
    #[must_use]
    pub fn fail_candles_for(mut self, epoch: i64) -> Self {
        self.failing_epochs.insert(epoch);
        self
    }

    /// Total candle queries received.
    pub fn candle_calls(&self) -> usize {
        self.candle_calls.load(Ordering::SeqCst)
    }

    /// Highest number of candle queries outstanding at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Every candle request received, in arrival order.
    pub async fn requests(&self) -> Vec<CandleRequest> {
        self.requests.lock().await.clone()
    }

    /// The round starting at `start_at`, as the mock serves it.
    #[must_use]
    pub fn round_at(&self, start_at: i64) -> Round {
        let seq = (start_at - GENESIS) / self.round_interval + 1;
        let bull = 10 + seq % 7;
        let bear = 10 + seq % 5;
        Round {
            epoch: seq.to_string(),
            position: Some(if seq % 2 == 0 { "Bull" } else { "Bear" }.to_string()),
            failed: Some(false),
            start_at,
            close_at: start_at + self.round_interval,
            total_bets: (bull + bear).to_string(),
            total_amount: format!("{}.{:02}", bull + bear, seq % 100),
            bull_bets: bull.to_string(),
            bull_amount: format!("{bull}.{:02}", seq % 100),
            bear_bets: bear.to_string(),
            bear_amount: format!("{bear}.00"),
        }
    }

    /// The candle opening at `open_time` for bars of `step_ms`.
    #[must_use]
    pub fn candle_at(open_time: i64, step_ms: i64) -> Candle {
        let tick = open_time / step_ms;
        let cents = tick % 100;
        Candle {
            open_time,
            open: format!("600.{cents:02}"),
            high: format!("601.{cents:02}"),
            low: format!("599.{cents:02}"),
            close: format!("600.{:02}", (cents + 1) % 100),
            volume: format!("{}.5", 1000 + tick % 500),
            close_time: open_time + step_ms - 1,
            quote_asset_volume: format!("{}.25", 600_000 + tick % 500),
            number_of_trades: u64::try_from(500 + tick % 500).unwrap_or(0),
            taker_buy_base_volume: format!("{}.5", 500 + tick % 250),
            taker_buy_quote_volume: format!("{}.25", 300_000 + tick % 250),
            ignore: "0".to_string(),
        }
    }
}

/// Parse interval labels such as `1m`, `5m`, `1h`, `1d` into milliseconds.
#[must_use]
pub fn interval_ms(label: &str) -> Option<i64> {
    let unit = label.chars().last()?;
    let n: i64 = label[..label.len() - unit.len_utf8()].parse().ok()?;
    let scale = match unit {
        's' => 1_000,
        'm' => 60_000,
        'h' => 3_600_000,
        'd' => 86_400_000,
        _ => return None,
    };
    (n > 0).then(|| n * scale)
}

impl EpocaConnector for MockConnector {
    fn name(&self) -> &'static str {
        "epoca-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_round_provider(&self) -> Option<&dyn RoundProvider> {
        Some(self as &dyn RoundProvider)
    }

    fn as_candle_provider(&self) -> Option<&dyn CandleProvider> {
        Some(self as &dyn CandleProvider)
    }
}

#[async_trait]
impl RoundProvider for MockConnector {
    async fn rounds(&self, range: EpochRange) -> Result<Vec<Round>, EpocaError> {
        if self.failing_ranges.contains(&range.start) {
            return Err(EpocaError::connector(
                "epoca-mock",
                format!("forced failure: rounds from {}", range.start),
            ));
        }
        let step = self.round_interval;
        let first_k = (range.start - GENESIS + step - 1).div_euclid(step).max(0);
        let mut out = Vec::new();
        let mut start_at = GENESIS + first_k * step;
        while start_at <= range.end {
            out.push(self.round_at(start_at));
            start_at += step;
        }
        Ok(out)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CandleProvider for MockConnector {
    async fn candles(&self, req: &CandleRequest) -> Result<Vec<Candle>, EpocaError> {
        self.candle_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.requests.lock().await.push(req.clone());

        if let Some(latency) = self.candle_latency {
            tokio::time::sleep(latency).await;
        }

        let step = interval_ms(&req.interval).ok_or_else(|| {
            EpocaError::InvalidArg(format!("unsupported interval '{}'", req.interval))
        })?;

        let end_secs = req.end_ms.div_euclid(1000);
        let seq = (end_secs - GENESIS).div_euclid(self.round_interval) + 2;
        let failing = self.failing_epochs.contains(&seq);
        if failing {
            return Err(EpocaError::connector(
                "epoca-mock",
                format!("forced failure: candles ending {}", req.end_ms),
            ));
        }

        let mut open_time = req.start_ms.div_euclid(step) * step;
        if open_time < req.start_ms {
            open_time += step;
        }
        let mut out = Vec::new();
        while open_time <= req.end_ms && out.len() < req.limit as usize {
            out.push(Self::candle_at(open_time, step));
            open_time += step;
        }
        Ok(out)
    }
}
