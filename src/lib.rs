//! Core behind a single-page YouTube download GUI.
//!
//! The presentation layer renders inputs and messages; everything it can
//! trigger lives here: the URL gate, metadata fetching with placeholder
//! defaulting, best-progressive-MP4 download, and the download-directory
//! lifecycle. Extraction itself is delegated to a [`StreamProvider`]
//! backend (yt-dlp by default).

mod downloader;
pub mod logging;
mod session;

pub use downloader::{
    download_video, fetch_metadata, url, DownloadError, DownloadResult, DownloadStore, OpContext,
    ProviderConfig, SourceMetadata, StreamCandidate, StreamProvider, VideoMetadata,
    VideoReference, YtDlpProvider, DOWNLOAD_DIR,
};
pub use session::Session;
