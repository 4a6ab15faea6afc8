use epoca_core::{
    EmptyWindowPolicy, EpocaError, Round, RunReport, Window, WindowOutcome, WindowPlan,
    WindowStatus, artifact_name, encode_rounds,
};

use crate::Epoca;
use crate::core::tag_err;

impl Epoca {
    /// Process every window of `plan` in order.
    ///
    /// Windows are handled one at a time. A failing window is logged, recorded as
    /// [`WindowStatus::Failed`] and left without an artifact; processing continues
    /// with the next window.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "epoca::run",
            skip(self, plan),
            fields(first = %plan.first_day(), last = %plan.last_day(), windows = plan.len()),
        )
    )]
    pub async fn run(&self, plan: &WindowPlan) -> RunReport {
        let mut outcomes = Vec::with_capacity(plan.len());
        for window in plan {
            let status = match self.run_window(&window).await {
                Ok(status) => status,
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(window = %window, error = %e, "window failed");
                    WindowStatus::Failed(e)
                }
            };
            outcomes.push(WindowOutcome { window, status });
        }
        RunReport { outcomes }
    }

    /// Parse a `DD-MM-YYYY` date range and run it.
    ///
    /// # Errors
    /// Returns `InvalidArg` if either date is malformed. Window failures do not
    /// surface here; they are recorded in the report.
    pub async fn run_range(&self, start: &str, end: &str) -> Result<RunReport, EpocaError> {
        let plan = WindowPlan::parse(start, end)?;
        Ok(self.run(&plan).await)
    }

    /// Fetch, enrich and export a single window.
    ///
    /// # Errors
    /// Returns the first failure encountered: the round query, any candle query
    /// (in round order), encoding, or the sink write. No artifact is written when
    /// an error is returned.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "epoca::window", skip(self, window), fields(window = %window))
    )]
    pub async fn run_window(&self, window: &Window) -> Result<WindowStatus, EpocaError> {
        let rounds = self.window_rounds(window).await?;

        if rounds.is_empty() && self.cfg.empty_windows == EmptyWindowPolicy::Skip {
            #[cfg(feature = "tracing")]
            tracing::info!(window = %window, "no rounds; skipping window");
            return Ok(WindowStatus::Skipped);
        }

        let enriched = self.enrich_all(rounds).await?;
        let artifact = artifact_name(window, &self.cfg.artifact_label);
        let bytes = encode_rounds(&enriched)?;
        self.sink
            .emit(&artifact, bytes)
            .await
            .map_err(|e| match e {
                e @ EpocaError::Export { .. } => e,
                other => EpocaError::export(&artifact, other.to_string()),
            })?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            window = %window,
            artifact = %artifact,
            rounds = enriched.len(),
            sink = self.sink.name(),
            "exported window"
        );

        Ok(WindowStatus::Exported {
            artifact,
            rounds: enriched.len(),
        })
    }

    async fn window_rounds(&self, window: &Window) -> Result<Vec<Round>, EpocaError> {
        let provider = self.round_provider()?;
        let range = window.epoch_range();
        let mut rounds = Self::provider_call_with_timeout(
            self.rounds_from.name(),
            "rounds",
            self.cfg.provider_timeout,
            provider.rounds(range),
        )
        .await?;

        let before = rounds.len();
        rounds.retain(|r| range.contains(r.start_at));
        if rounds.len() < before {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                window = %window,
                dropped = before - rounds.len(),
                "round provider returned rounds outside the window"
            );
        }
        if !is_ascending(&rounds) {
            return Err(tag_err(
                self.rounds_from.name(),
                EpocaError::Data("rounds are not in ascending sequence order".to_string()),
            ));
        }
        Ok(rounds)
    }
}

fn is_ascending(rounds: &[Round]) -> bool {
    rounds.windows(2).all(|pair| match (pair[0].sequence(), pair[1].sequence()) {
        (Some(a), Some(b)) => a < b,
        _ => true,
    })
}
