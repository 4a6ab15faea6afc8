use std::path::{Path, PathBuf};

use async_trait::async_trait;
use epoca_core::EpocaError;
use epoca_core::connector::ArtifactSink;

/// Sink writing each artifact as a file inside one directory.
///
/// The directory is created on first use. Each artifact is written to a hidden
/// temporary file and renamed into place, so a failed write never leaves a
/// truncated artifact behind. Existing files with the same name are replaced.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    fn name(&self) -> &'static str {
        "directory"
    }

    async fn emit(&self, name: &str, bytes: Vec<u8>) -> Result<(), EpocaError> {
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
            return Err(EpocaError::export(name, "not a plain file name"));
        }
        let io_err = |e: std::io::Error| EpocaError::export(name, e.to_string());

        tokio::fs::create_dir_all(&self.dir).await.map_err(io_err)?;
        let path = self.dir.join(name);
        let partial = self.dir.join(format!(".{name}.partial"));
        if let Err(e) = tokio::fs::write(&partial, &bytes).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(io_err(e));
        }
        if let Err(e) = tokio::fs::rename(&partial, &path).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(io_err(e));
        }
        Ok(())
    }
}
