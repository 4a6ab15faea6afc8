use std::sync::Arc;
use std::time::Duration;

use epoca::{Epoca, EpocaError, WindowStatus};
use epoca_mock::{MemorySink, MockConnector};

use crate::helpers::{
    HOUR, MAR_01, MAR_01_ARTIFACTS, Scripted, decode, lookback_candles, rounds_from,
};

#[tokio::test(start_paused = true)]
async fn output_order_follows_rounds_not_completion() {
    let first_start = MAR_01 + 300;
    let sink = Arc::new(MemorySink::new());
    let epoca = Epoca::builder()
        .with_connector(Arc::new(
            Scripted::new("scripted")
                .with_rounds(rounds_from(1, first_start, 5))
                .with_candles(lookback_candles)
                // Earlier rounds answer last.
                .with_candle_delay(move |req| {
                    let idx = (req.end_ms / 1000 + 300 - first_start) / 300;
                    Duration::from_millis(u64::try_from(100 - 10 * idx).unwrap())
                }),
        ))
        .sink(sink.clone())
        .build()
        .unwrap();

    epoca.run_range("01-03-2025", "01-03-2025").await.unwrap();

    let rounds = decode(&sink.get(MAR_01_ARTIFACTS[0]).await.unwrap());
    let epochs: Vec<&str> = rounds.iter().map(|r| r.round.epoch.as_str()).collect();
    assert_eq!(epochs, vec!["1", "2", "3", "4", "5"]);
}

#[tokio::test(start_paused = true)]
async fn fan_out_is_bounded_by_one_window() {
    let mock = Arc::new(
        MockConnector::new()
            .round_interval(HOUR)
            .candle_latency(Duration::from_millis(50)),
    );
    let epoca = Epoca::builder()
        .with_connector(mock.clone())
        .sink(Arc::new(MemorySink::new()))
        .build()
        .unwrap();

    let report = epoca.run_range("01-03-2025", "02-03-2025").await.unwrap();

    assert!(report.is_complete_success());
    assert_eq!(mock.candle_calls(), 48);
    // All eight rounds of a window are requested together, never more.
    assert_eq!(mock.max_in_flight(), 8);
}

#[tokio::test(start_paused = true)]
async fn slow_candle_provider_times_out() {
    let sink = Arc::new(MemorySink::new());
    let epoca = Epoca::builder()
        .with_connector(Arc::new(
            Scripted::new("scripted")
                .with_rounds(rounds_from(1, MAR_01 + 300, 3))
                .with_candles(lookback_candles)
                .with_candle_delay(|_| Duration::from_secs(120)),
        ))
        .sink(sink.clone())
        .provider_timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    let report = epoca.run_range("01-03-2025", "01-03-2025").await.unwrap();

    assert_eq!(
        report.outcomes[0].status,
        WindowStatus::Failed(EpocaError::provider_timeout("scripted", "candles"))
    );
    assert_eq!(sink.names().await, MAR_01_ARTIFACTS[1..].to_vec());
}

#[tokio::test(start_paused = true)]
async fn slow_round_provider_times_out() {
    let epoca = Epoca::builder()
        .with_connector(Arc::new(
            Scripted::new("registry")
                .with_rounds(rounds_from(1, MAR_01 + 300, 3))
                .with_round_delay(Duration::from_secs(60)),
        ))
        .with_connector(Arc::new(
            Scripted::new("market").with_candles(lookback_candles),
        ))
        .sink(Arc::new(MemorySink::new()))
        .provider_timeout(Duration::from_secs(1))
        .build()
        .unwrap();

    let report = epoca.run_range("01-03-2025", "01-03-2025").await.unwrap();

    assert_eq!(report.failures().len(), 3);
    for (_, err) in report.failures() {
        assert_eq!(*err, EpocaError::provider_timeout("registry", "rounds"));
        assert!(err.is_transport());
    }
}
