use std::sync::Arc;
use std::time::Duration;

use epoca_core::connector::{ArtifactSink, CandleProvider, EpocaConnector, RoundProvider};
use epoca_core::lookback;
use epoca_core::{EmptyWindowPolicy, EpocaConfig, EpocaError, LookbackConfig};

/// Orchestrator that drives the fetch, enrich and export pipeline over a window plan.
pub struct Epoca {
    pub(crate) rounds_from: Arc<dyn EpocaConnector>,
    pub(crate) candles_from: Arc<dyn EpocaConnector>,
    pub(crate) sink: Arc<dyn ArtifactSink>,
    pub(crate) cfg: EpocaConfig,
}

/// Builder for constructing an `Epoca` orchestrator with custom configuration.
pub struct EpocaBuilder {
    connectors: Vec<Arc<dyn EpocaConnector>>,
    sink: Option<Arc<dyn ArtifactSink>>,
    cfg: EpocaConfig,
}

impl Default for EpocaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EpocaBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Starts with no connectors and no sink; both must be supplied before
    /// [`build`](Self::build) succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            sink: None,
            cfg: EpocaConfig::default(),
        }
    }

    /// Register a connector.
    ///
    /// The first registered connector advertising a capability serves it; a single
    /// connector may serve both rounds and candles.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn EpocaConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Set the destination for window artifacts.
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn ArtifactSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: EpocaConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Replace the lookback parameters.
    #[must_use]
    pub fn lookback(mut self, lookback: LookbackConfig) -> Self {
        self.cfg.lookback = lookback;
        self
    }

    /// Set the instrument symbol sent to the candle provider.
    #[must_use]
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.cfg.lookback.symbol = symbol.into();
        self
    }

    /// Set the label embedded in artifact names.
    #[must_use]
    pub fn artifact_label(mut self, label: impl Into<String>) -> Self {
        self.cfg.artifact_label = label.into();
        self
    }

    /// Select what happens to windows without rounds.
    #[must_use]
    pub const fn empty_windows(mut self, policy: EmptyWindowPolicy) -> Self {
        self.cfg.empty_windows = policy;
        self
    }

    /// Set the per-request provider timeout.
    ///
    /// Bounds every round query and every candle query individually; an expired
    /// request fails its window with `ProviderTimeout`.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Build the `Epoca` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no registered connector serves rounds or candles,
    /// if no sink is set, or if the configuration is invalid.
    pub fn build(self) -> Result<Epoca, EpocaError> {
        lookback::validate(&self.cfg.lookback)?;

        let label = self.cfg.artifact_label.as_str();
        if label.is_empty() || label.contains(['/', '\\']) {
            return Err(EpocaError::InvalidArg(format!(
                "artifact label must be a non-empty file-name fragment, got {label:?}"
            )));
        }
        if self.cfg.provider_timeout.is_zero() {
            return Err(EpocaError::InvalidArg(
                "provider timeout must be positive".to_string(),
            ));
        }

        let rounds_from = self
            .connectors
            .iter()
            .find(|c| c.as_round_provider().is_some())
            .cloned()
            .ok_or_else(|| {
                EpocaError::InvalidArg(
                    "no round provider registered; add one via with_connector(...)".to_string(),
                )
            })?;
        let candles_from = self
            .connectors
            .iter()
            .find(|c| c.as_candle_provider().is_some())
            .cloned()
            .ok_or_else(|| {
                EpocaError::InvalidArg(
                    "no candle provider registered; add one via with_connector(...)".to_string(),
                )
            })?;
        let sink = self.sink.ok_or_else(|| {
            EpocaError::InvalidArg("no artifact sink set; add one via sink(...)".to_string())
        })?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            rounds = rounds_from.name(),
            rounds_vendor = rounds_from.vendor(),
            candles = candles_from.name(),
            candles_vendor = candles_from.vendor(),
            sink = sink.name(),
            "connectors selected"
        );

        Ok(Epoca {
            rounds_from,
            candles_from,
            sink,
            cfg: self.cfg,
        })
    }
}

/// Attribute an untyped error to the connector that produced it.
pub(crate) fn tag_err(connector: &str, e: EpocaError) -> EpocaError {
    match e {
        e @ (EpocaError::Connector { .. }
        | EpocaError::ProviderTimeout { .. }
        | EpocaError::Shape { .. }) => e,
        other => EpocaError::Connector {
            connector: connector.to_string(),
            msg: other.to_string(),
        },
    }
}

impl Epoca {
    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "epoca::core::provider_call_with_timeout",
            level = "debug",
            skip(fut),
            fields(
                connector = connector_name,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, EpocaError>
    where
        Fut: core::future::Future<Output = Result<T, EpocaError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(EpocaError::provider_timeout(connector_name, capability)))
            .map_err(|e| tag_err(connector_name, e))
    }

    /// Start building a new `Epoca` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use epoca::{DirectorySink, EmptyWindowPolicy, Epoca};
    /// use epoca_mock::MockConnector;
    ///
    /// let epoca = Epoca::builder()
    ///     .with_connector(Arc::new(MockConnector::new()))
    ///     .sink(Arc::new(DirectorySink::new("out")))
    ///     .empty_windows(EmptyWindowPolicy::Skip)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> EpocaBuilder {
        EpocaBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EpocaConfig {
        &self.cfg
    }

    pub(crate) fn round_provider(&self) -> Result<&dyn RoundProvider, EpocaError> {
        self.rounds_from
            .as_round_provider()
            .ok_or_else(|| EpocaError::unsupported("rounds"))
    }

    pub(crate) fn candle_provider(&self) -> Result<&dyn CandleProvider, EpocaError> {
        self.candles_from
            .as_candle_provider()
            .ok_or_else(|| EpocaError::unsupported("candles"))
    }
}
