//! Artifact naming and encoding for one window.

use epoca_types::{EnrichedRound, EpocaError, Window};

/// Artifact name for `window`: `Data<label><DDMMYYYY>-<SH>-<EH>.json`.
///
/// Hours are zero-padded; the closing slot is labelled `23`.
#[must_use]
pub fn artifact_name(window: &Window, label: &str) -> String {
    format!(
        "Data{label}{}-{:02}-{:02}.json",
        window.day_label(),
        window.start_hour(),
        window.end_hour()
    )
}

/// Serialize a window's rounds as one compact JSON array.
///
/// # Errors
/// Returns `Data` if serialization fails.
pub fn encode_rounds(rounds: &[EnrichedRound]) -> Result<Vec<u8>, EpocaError> {
    serde_json::to_vec(rounds).map_err(|e| EpocaError::Data(format!("encode rounds: {e}")))
}
