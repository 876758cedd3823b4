// Download directory lifecycle
//
// One fixed directory holds every downloaded file. Creation failures are
// reported upward rather than aborting startup; clearing makes no atomicity
// guarantee (a failed clear leaves whatever the partial deletion left).

use std::path::{Path, PathBuf};

use tracing::{error, info};

use super::errors::DownloadError;

/// Default directory, relative to the process working directory.
pub const DOWNLOAD_DIR: &str = "downloads";

#[derive(Debug, Clone)]
pub struct DownloadStore {
    root: PathBuf,
}

impl DownloadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if absent. Non-fatal on failure.
    pub fn ensure(&self) -> Result<(), DownloadError> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            error!("could not create {}: {}", self.root.display(), e);
            DownloadError::Filesystem(format!(
                "could not create {}: {}",
                self.root.display(),
                e
            ))
        })
    }

    /// Delete everything and recreate the directory.
    pub fn clear(&self) -> Result<(), DownloadError> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root).map_err(|e| {
                error!("could not clear {}: {}", self.root.display(), e);
                DownloadError::Filesystem(format!(
                    "could not clear {}: {}",
                    self.root.display(),
                    e
                ))
            })?;
        }
        self.ensure()?;
        info!("cleared download directory {}", self.root.display());
        Ok(())
    }

    /// Path of a file inside the store.
    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }
}

impl Default for DownloadStore {
    fn default() -> Self {
        Self::new(DOWNLOAD_DIR)
    }
}
