use epoca_core::{Candle, CandleRequest, EnrichedRound, EpocaError, Round};

use crate::Epoca;

impl Epoca {
    /// Fetch the lookback candles for one round and attach them.
    ///
    /// Candles opening at or after the round start are discarded and at most
    /// `limit` candles are kept, so the result never leaks post-start prices.
    ///
    /// # Errors
    /// Propagates the candle provider's error (tagged with its connector name) or
    /// `ProviderTimeout` when the request exceeds the configured timeout.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "epoca::enrich::round",
            level = "debug",
            skip(self, round),
            fields(epoch = %round.epoch, start_at = round.start_at),
        )
    )]
    pub async fn enrich_round(&self, round: Round) -> Result<EnrichedRound, EpocaError> {
        let provider = self.candle_provider()?;
        let req = CandleRequest::for_round(&round, &self.cfg.lookback);
        let fetched = Self::provider_call_with_timeout(
            self.candles_from.name(),
            "candles",
            self.cfg.provider_timeout,
            provider.candles(&req),
        )
        .await?;

        let cutoff = round.start_at_ms();
        let fetched_len = fetched.len();
        let mut candles: Vec<Candle> = fetched
            .into_iter()
            .filter(|c| c.open_time < cutoff)
            .collect();
        if candles.len() < fetched_len {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                epoch = %round.epoch,
                dropped = fetched_len - candles.len(),
                "discarded candles opening at or after round start"
            );
        }
        candles.truncate(usize::try_from(req.limit).unwrap_or(usize::MAX));

        Ok(round.enrich(candles))
    }

    /// Enrich every round concurrently, preserving input order.
    ///
    /// All requests for the batch are issued at once; the first error in input
    /// order fails the whole batch.
    pub(crate) async fn enrich_all(
        &self,
        rounds: Vec<Round>,
    ) -> Result<Vec<EnrichedRound>, EpocaError> {
        let tasks = rounds.into_iter().map(|round| self.enrich_round(round));
        futures::future::join_all(tasks).await.into_iter().collect()
    }
}
