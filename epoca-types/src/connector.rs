//! Stable identifiers for data-source connectors.

use std::fmt;

/// Static name of a connector, as it appears in logs and `Connector` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorKey(&'static str);

impl ConnectorKey {
    /// Wrap a static connector name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The wrapped name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl From<ConnectorKey> for String {
    fn from(key: ConnectorKey) -> Self {
        key.0.to_string()
    }
}

impl fmt::Display for ConnectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
