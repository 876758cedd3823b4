// Session - the action surface the presentation layer calls
//
// One session per UI page. Actions are synchronous from the UI's point of
// view: each call runs one provider or filesystem operation to completion.
// The session enforces the core invariant that nothing reaches the provider
// unless the raw input passed the URL gate.

use crate::downloader::context::OpContext;
use crate::downloader::errors::DownloadError;
use crate::downloader::models::{DownloadResult, VideoMetadata, VideoReference};
use crate::downloader::providers::{ProviderConfig, StreamProvider};
use crate::downloader::storage::DownloadStore;
use crate::downloader::{executor, metadata};

pub struct Session {
    provider: Box<dyn StreamProvider>,
    config: ProviderConfig,
    store: DownloadStore,
    ctx: OpContext,
    show_debug: bool,
}

impl Session {
    /// Build a session over a provider. Creates the download directory;
    /// a creation failure is returned for display but the session is still
    /// usable (the executor retries creation per download).
    pub fn new(
        provider: Box<dyn StreamProvider>,
        config: ProviderConfig,
        store: DownloadStore,
    ) -> (Self, Option<DownloadError>) {
        let startup_error = store.ensure().err();
        let session = Self {
            provider,
            config,
            store,
            ctx: OpContext::new(),
            show_debug: false,
        };
        (session, startup_error)
    }

    /// Validate, normalize, and fetch metadata for display.
    ///
    /// Only validation can fail here; once the gate passes, the fetch
    /// always produces a displayable record.
    pub async fn analyze(&mut self, raw_url: &str) -> Result<VideoMetadata, DownloadError> {
        let vref = VideoReference::parse(raw_url)?;
        Ok(metadata::fetch_metadata(
            self.provider.as_ref(),
            &self.config,
            &mut self.ctx,
            &vref.url,
        )
        .await)
    }

    /// Validate, normalize, and download the best progressive MP4.
    pub async fn download(&mut self, raw_url: &str) -> DownloadResult {
        let vref = match VideoReference::parse(raw_url) {
            Ok(vref) => vref,
            Err(e) => {
                self.ctx.record_failure(e.to_string());
                return DownloadResult::failed(e.to_string());
            }
        };
        executor::download_video(
            self.provider.as_ref(),
            &self.config,
            &self.store,
            &mut self.ctx,
            &vref.url,
        )
        .await
    }

    /// Erase and recreate the download directory.
    pub fn clear_downloads(&mut self) -> Result<(), DownloadError> {
        self.store.clear().map_err(|e| {
            self.ctx.record_failure(e.to_string());
            e
        })
    }

    pub fn set_debug(&mut self, enabled: bool) {
        self.show_debug = enabled;
    }

    /// Last failure detail, when the debug toggle is on.
    pub fn debug_info(&self) -> Option<&str> {
        if self.show_debug {
            self.ctx.last_error()
        } else {
            None
        }
    }

    pub fn download_dir(&self) -> &std::path::Path {
        self.store.root()
    }
}
