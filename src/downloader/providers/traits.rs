// StreamProvider trait - the extractor capability boundary
//
// Everything the core knows about YouTube goes through this trait, so the
// extraction backend can be swapped or faked in tests without touching the
// validation, metadata, or download logic.

use std::path::Path;

use async_trait::async_trait;

use crate::downloader::errors::DownloadError;
use crate::downloader::models::{SourceMetadata, StreamCandidate};

/// Configuration handed to every provider call.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// SOCKS5/HTTP proxy URL (e.g. "socks5://127.0.0.1:1080")
    pub proxy: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            proxy: None,
        }
    }
}

impl ProviderConfig {
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }
}

/// Trait for video extraction backends.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Name of the provider (for logging)
    fn name(&self) -> &'static str;

    /// Whether the backing tool is present on this system
    fn is_available(&self) -> bool;

    /// Confirm the video resolves and is not restricted
    async fn check_availability(
        &self,
        url: &str,
        config: &ProviderConfig,
    ) -> Result<(), DownloadError>;

    /// Raw metadata bundle; individual fields may be absent
    async fn fetch_metadata(
        &self,
        url: &str,
        config: &ProviderConfig,
    ) -> Result<SourceMetadata, DownloadError>;

    /// All stream variants the extractor can see for this video
    async fn list_streams(
        &self,
        url: &str,
        config: &ProviderConfig,
    ) -> Result<Vec<StreamCandidate>, DownloadError>;

    /// Write the stream's bytes to `dest`. Single attempt, no retries.
    async fn retrieve_stream(
        &self,
        stream: &StreamCandidate,
        dest: &Path,
        config: &ProviderConfig,
    ) -> Result<(), DownloadError>;
}
