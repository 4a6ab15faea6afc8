use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the epoca workspace.
///
/// Transport failures from either remote API surface as `Connector` (or
/// `ProviderTimeout`), malformed payloads as `Shape`, and local write failures as
/// `Export`. The orchestrator treats all of them as window-local.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EpocaError {
    /// No registered connector serves the capability ("rounds", "candles").
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "rounds").
        capability: String,
    },

    /// Issues with the returned or expected data that are not shape related.
    #[error("data issue: {0}")]
    Data(String),

    /// A caller-supplied value was rejected (dates, URLs, configuration).
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A remote payload did not match the expected schema.
    #[error("shape mismatch in {what}: {detail}")]
    Shape {
        /// Payload being decoded, e.g. "kline row 3".
        what: String,
        /// Description of the mismatch.
        detail: String,
    },

    /// A remote call failed in transport or answered with an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector that made the call.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A remote call did not settle within `provider_timeout`.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Connector that made the call.
        connector: String,
        /// Capability label (e.g. "rounds", "candles").
        capability: String,
    },

    /// Writing an artifact failed.
    #[error("export of {artifact} failed: {msg}")]
    Export {
        /// Artifact name that could not be written.
        artifact: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl EpocaError {
    /// `Unsupported` for the given capability label.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// `Connector` attributed to `connector`.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// `Shape` for the payload `what`.
    pub fn shape(what: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Shape {
            what: what.into(),
            detail: detail.into(),
        }
    }

    /// `ProviderTimeout` for a connector and capability label.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// `Export` for the artifact `artifact`.
    pub fn export(artifact: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Export {
            artifact: artifact.into(),
            msg: msg.into(),
        }
    }

    /// Returns true when the error came from a remote call rather than local processing.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Connector { .. } | Self::ProviderTimeout { .. }
        )
    }
}
