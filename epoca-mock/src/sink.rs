use std::collections::HashSet;

use async_trait::async_trait;
use epoca_core::EpocaError;
use epoca_core::connector::ArtifactSink;
use tokio::sync::Mutex;

/// Sink that keeps every artifact in memory, in emission order.
#[derive(Default)]
pub struct MemorySink {
    artifacts: Mutex<Vec<(String, Vec<u8>)>>,
    rejected: HashSet<String>,
}

impl MemorySink {
    /// Empty sink accepting every artifact.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse to store the artifact called `name`.
    #[must_use]
    pub fn reject(mut self, name: impl Into<String>) -> Self {
        self.rejected.insert(name.into());
        self
    }

    /// Snapshot of stored artifacts.
    pub async fn artifacts(&self) -> Vec<(String, Vec<u8>)> {
        self.artifacts.lock().await.clone()
    }

    /// Names of stored artifacts.
    pub async fn names(&self) -> Vec<String> {
        self.artifacts
            .lock()
            .await
            .iter()
            .map(|(n, _)| n.clone())
            .collect()
    }

    /// Bytes of the artifact called `name`, if stored.
    pub async fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.artifacts
            .lock()
            .await
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, b)| b.clone())
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn emit(&self, name: &str, bytes: Vec<u8>) -> Result<(), EpocaError> {
        if self.rejected.contains(name) {
            return Err(EpocaError::export(name, "rejected by sink"));
        }
        self.artifacts.lock().await.push((name.to_string(), bytes));
        Ok(())
    }
}
