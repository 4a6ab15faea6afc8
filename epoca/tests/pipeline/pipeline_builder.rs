use std::sync::Arc;
use std::time::Duration;

use epoca::{EmptyWindowPolicy, Epoca, EpocaConfig, EpocaError, LookbackConfig};
use epoca_mock::{MemorySink, MockConnector};

use crate::helpers::{Scripted, lookback_candles};

fn invalid_arg(res: Result<Epoca, EpocaError>) -> String {
    match res {
        Err(EpocaError::InvalidArg(msg)) => msg,
        Err(other) => panic!("expected InvalidArg, got {other:?}"),
        Ok(_) => panic!("expected InvalidArg, got a built orchestrator"),
    }
}

#[test]
fn requires_round_and_candle_providers_and_sink() {
    let msg = invalid_arg(Epoca::builder().sink(Arc::new(MemorySink::new())).build());
    assert!(msg.contains("round provider"));

    let msg = invalid_arg(
        Epoca::builder()
            .with_connector(Arc::new(Scripted::new("registry").with_rounds(vec![])))
            .sink(Arc::new(MemorySink::new()))
            .build(),
    );
    assert!(msg.contains("candle provider"));

    let msg = invalid_arg(
        Epoca::builder()
            .with_connector(Arc::new(MockConnector::new()))
            .build(),
    );
    assert!(msg.contains("sink"));
}

#[test]
fn rejects_invalid_configuration() {
    let base = || {
        Epoca::builder()
            .with_connector(Arc::new(MockConnector::new()))
            .sink(Arc::new(MemorySink::new()))
    };

    invalid_arg(
        base()
            .lookback(LookbackConfig {
                lead_secs: 300,
                gap_secs: 300,
                ..LookbackConfig::default()
            })
            .build(),
    );
    invalid_arg(base().symbol("  ").build());
    invalid_arg(base().artifact_label("").build());
    invalid_arg(base().artifact_label("../Bnb").build());
    invalid_arg(base().provider_timeout(Duration::ZERO).build());
}

#[test]
fn modifiers_land_in_config() {
    let epoca = Epoca::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .sink(Arc::new(MemorySink::new()))
        .symbol("ETHUSDT")
        .artifact_label("Eth")
        .empty_windows(EmptyWindowPolicy::Skip)
        .provider_timeout(Duration::from_secs(3))
        .build()
        .unwrap();

    let cfg = epoca.config();
    assert_eq!(cfg.lookback.symbol, "ETHUSDT");
    assert_eq!(cfg.lookback.limit, 36);
    assert_eq!(cfg.artifact_label, "Eth");
    assert_eq!(cfg.empty_windows, EmptyWindowPolicy::Skip);
    assert_eq!(cfg.provider_timeout, Duration::from_secs(3));
}

#[test]
fn config_replaces_defaults_wholesale() {
    let cfg = EpocaConfig {
        artifact_label: "Btc".to_string(),
        ..EpocaConfig::default()
    };
    let epoca = Epoca::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .sink(Arc::new(MemorySink::new()))
        .config(cfg)
        .build()
        .unwrap();
    assert_eq!(epoca.config().artifact_label, "Btc");
    assert_eq!(epoca.config().provider_timeout, Duration::from_secs(30));
}

#[tokio::test]
async fn first_capable_connector_serves_each_capability() {
    let epoca = Epoca::builder()
        .with_connector(Arc::new(Scripted::new("market").with_candles(lookback_candles)))
        .with_connector(Arc::new(Scripted::new("registry").with_rounds(vec![])))
        .with_connector(Arc::new(
            Scripted::new("backup").with_candles(|_| Err(EpocaError::Other("unused".into()))),
        ))
        .sink(Arc::new(MemorySink::new()))
        .build()
        .unwrap();

    let enriched = epoca
        .enrich_round(crate::helpers::round(1, crate::helpers::MAR_01))
        .await
        .unwrap();
    assert_eq!(enriched.candles.len(), 36);
}
