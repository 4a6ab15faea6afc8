//! Report envelopes produced by a pipeline run.

use serde::{Deserialize, Serialize};

use crate::Window;
use crate::error::EpocaError;

/// Result of processing a single window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowStatus {
    /// An artifact was written.
    Exported {
        /// Artifact name.
        artifact: String,
        /// Number of rounds in the artifact.
        rounds: usize,
    },
    /// The window had no rounds and the empty-window policy suppressed output.
    Skipped,
    /// The window was abandoned; no artifact was written.
    Failed(EpocaError),
}

/// Outcome of one window in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowOutcome {
    /// The processed window.
    pub window: Window,
    /// What happened to it.
    pub status: WindowStatus,
}

/// Summary of a full pipeline run, one outcome per planned window in plan order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunReport {
    /// Per-window outcomes.
    pub outcomes: Vec<WindowOutcome>,
}

impl RunReport {
    /// Names of the artifacts written, in emission order.
    #[must_use]
    pub fn artifacts(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                WindowStatus::Exported { artifact, .. } => Some(artifact.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Windows that failed together with their errors.
    #[must_use]
    pub fn failures(&self) -> Vec<(&Window, &EpocaError)> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                WindowStatus::Failed(e) => Some((&o.window, e)),
                _ => None,
            })
            .collect()
    }

    /// True when no window failed.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| !matches!(o.status, WindowStatus::Failed(_)))
    }
}
