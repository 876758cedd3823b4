// Scripted in-memory provider for exercising the core without a network

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{ProviderConfig, StreamProvider};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::{SourceMetadata, StreamCandidate};

/// Provider whose every response is scripted up front. Records which calls
/// were made so tests can assert the validation gate held.
pub struct FakeProvider {
    pub metadata: Result<SourceMetadata, DownloadError>,
    pub streams: Result<Vec<StreamCandidate>, DownloadError>,
    pub retrieve: Result<(), DownloadError>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            metadata: Ok(SourceMetadata::default()),
            streams: Ok(Vec::new()),
            retrieve: Ok(()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the call log that survives boxing the provider.
    pub fn calls_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }

    pub fn with_metadata(mut self, metadata: SourceMetadata) -> Self {
        self.metadata = Ok(metadata);
        self
    }

    pub fn with_streams(mut self, streams: Vec<StreamCandidate>) -> Self {
        self.streams = Ok(streams);
        self
    }

    pub fn failing(error: DownloadError) -> Self {
        Self {
            metadata: Err(error.clone()),
            streams: Err(error.clone()),
            retrieve: Err(error),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl StreamProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn check_availability(
        &self,
        _url: &str,
        _config: &ProviderConfig,
    ) -> Result<(), DownloadError> {
        self.record("check_availability");
        self.metadata.as_ref().map(|_| ()).map_err(Clone::clone)
    }

    async fn fetch_metadata(
        &self,
        _url: &str,
        _config: &ProviderConfig,
    ) -> Result<SourceMetadata, DownloadError> {
        self.record("fetch_metadata");
        self.metadata.clone()
    }

    async fn list_streams(
        &self,
        _url: &str,
        _config: &ProviderConfig,
    ) -> Result<Vec<StreamCandidate>, DownloadError> {
        self.record("list_streams");
        self.streams.clone()
    }

    async fn retrieve_stream(
        &self,
        stream: &StreamCandidate,
        dest: &Path,
        _config: &ProviderConfig,
    ) -> Result<(), DownloadError> {
        self.record("retrieve_stream");
        self.retrieve.clone()?;
        tokio::fs::write(dest, stream.format_id.as_bytes())
            .await
            .map_err(DownloadError::from)
    }
}
