use std::sync::Arc;

use epoca::{Epoca, LookbackConfig};
use epoca_mock::{MemorySink, MockConnector};

use crate::helpers::{MAR_01, MAR_01_ARTIFACTS, Scripted, decode, lookback_candles, round};

#[tokio::test]
async fn candles_at_or_after_round_start_are_dropped() {
    let start_at = MAR_01 + 3600;
    let epoca = Epoca::builder()
        .with_connector(Arc::new(
            Scripted::new("scripted")
                .with_rounds(vec![round(1, start_at)])
                // Ignores the requested upper bound and runs ten minutes past the start.
                .with_candles(move |req| {
                    let mut req = req.clone();
                    req.end_ms = (start_at + 600) * 1000;
                    req.limit = 100;
                    lookback_candles(&req)
                }),
        ))
        .sink(Arc::new(MemorySink::new()))
        .build()
        .unwrap();

    let enriched = epoca.enrich_round(round(1, start_at)).await.unwrap();

    assert_eq!(enriched.candles.len(), 36);
    assert!(enriched.candles.iter().all(|c| c.open_time < start_at * 1000));
    assert_eq!(enriched.candles.last().unwrap().open_time, (start_at - 300) * 1000);
}

#[tokio::test]
async fn candle_count_is_capped_at_limit() {
    let start_at = MAR_01 + 7200;
    let epoca = Epoca::builder()
        .with_connector(Arc::new(
            Scripted::new("scripted")
                .with_rounds(vec![])
                .with_candles(|req| {
                    let mut wide = req.clone();
                    wide.start_ms -= 3_600_000;
                    wide.limit = 1000;
                    lookback_candles(&wide)
                }),
        ))
        .sink(Arc::new(MemorySink::new()))
        .build()
        .unwrap();

    let enriched = epoca.enrich_round(round(1, start_at)).await.unwrap();
    assert_eq!(enriched.candles.len(), 36);
}

#[tokio::test]
async fn custom_lookback_changes_requests() {
    let mock = Arc::new(MockConnector::new());
    let epoca = Epoca::builder()
        .with_connector(mock.clone())
        .sink(Arc::new(MemorySink::new()))
        .lookback(LookbackConfig {
            symbol: "ETHUSDT".to_string(),
            interval: "1m".to_string(),
            lead_secs: 1800,
            gap_secs: 60,
            limit: 30,
        })
        .build()
        .unwrap();

    let round = mock.round_at(MAR_01);
    let enriched = epoca.enrich_round(round).await.unwrap();

    assert_eq!(enriched.candles.len(), 30);
    assert_eq!(enriched.candles[0].open_time, (MAR_01 - 1800) * 1000);
    let req = &mock.requests().await[0];
    assert_eq!(req.symbol, "ETHUSDT");
    assert_eq!(req.interval, "1m");
    assert_eq!(req.end_ms, (MAR_01 - 60) * 1000);
}

#[tokio::test]
async fn rounds_outside_the_window_are_discarded() {
    let sink = Arc::new(MemorySink::new());
    let epoca = Epoca::builder()
        .with_connector(Arc::new(
            Scripted::new("scripted")
                .with_rounds(vec![
                    round(1, MAR_01 - 300),
                    round(2, MAR_01),
                    round(3, MAR_01 + 8 * 3600 - 300),
                    round(4, MAR_01 + 8 * 3600),
                ])
                .with_candles(lookback_candles)
                .leaky(),
        ))
        .sink(sink.clone())
        .build()
        .unwrap();

    epoca.run_range("01-03-2025", "01-03-2025").await.unwrap();

    let morning = decode(&sink.get(MAR_01_ARTIFACTS[0]).await.unwrap());
    let epochs: Vec<&str> = morning.iter().map(|r| r.round.epoch.as_str()).collect();
    assert_eq!(epochs, vec!["2", "3"]);
    let midday = decode(&sink.get(MAR_01_ARTIFACTS[1]).await.unwrap());
    assert_eq!(midday.len(), 1);
    assert_eq!(midday[0].round.epoch, "4");
}
