use std::sync::Arc;

use epoca::{EmptyWindowPolicy, Epoca, WindowPlan, WindowStatus};
use epoca_mock::MemorySink;

use crate::helpers::{MAR_01, MAR_01_ARTIFACTS, Scripted, decode, lookback_candles, rounds_from};

fn morning_only() -> Arc<Scripted> {
    Arc::new(
        Scripted::new("scripted")
            .with_rounds(rounds_from(100, MAR_01 + 600, 4))
            .with_candles(lookback_candles),
    )
}

#[tokio::test]
async fn empty_windows_emit_empty_arrays_by_default() {
    let sink = Arc::new(MemorySink::new());
    let epoca = Epoca::builder()
        .with_connector(morning_only())
        .sink(sink.clone())
        .build()
        .unwrap();

    let report = epoca.run_range("01-03-2025", "01-03-2025").await.unwrap();

    assert_eq!(sink.names().await, MAR_01_ARTIFACTS.to_vec());
    assert_eq!(decode(&sink.get(MAR_01_ARTIFACTS[0]).await.unwrap()).len(), 4);
    for name in &MAR_01_ARTIFACTS[1..] {
        assert_eq!(sink.get(name).await.unwrap(), b"[]".to_vec());
    }
    assert!(matches!(
        report.outcomes[1].status,
        WindowStatus::Exported { rounds: 0, .. }
    ));
}

#[tokio::test]
async fn skip_policy_writes_nothing_for_empty_windows() {
    let sink = Arc::new(MemorySink::new());
    let epoca = Epoca::builder()
        .with_connector(morning_only())
        .sink(sink.clone())
        .empty_windows(EmptyWindowPolicy::Skip)
        .build()
        .unwrap();

    let report = epoca.run_range("01-03-2025", "01-03-2025").await.unwrap();

    assert_eq!(sink.names().await, vec![MAR_01_ARTIFACTS[0]]);
    assert_eq!(report.outcomes[1].status, WindowStatus::Skipped);
    assert_eq!(report.outcomes[2].status, WindowStatus::Skipped);
    assert!(report.is_complete_success());
}

#[tokio::test]
async fn reversed_range_does_nothing() {
    let sink = Arc::new(MemorySink::new());
    let epoca = Epoca::builder()
        .with_connector(morning_only())
        .sink(sink.clone())
        .build()
        .unwrap();

    let plan = WindowPlan::parse("02-03-2025", "01-03-2025").unwrap();
    let report = epoca.run(&plan).await;

    assert!(report.outcomes.is_empty());
    assert!(report.is_complete_success());
    assert!(sink.names().await.is_empty());
}
