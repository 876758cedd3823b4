// Download core: URL gate, metadata fetcher, download executor, storage

pub mod context;
pub mod errors;
pub mod executor;
pub mod metadata;
pub mod models;
pub mod providers;
pub mod storage;
pub mod url;

pub use context::OpContext;
pub use errors::DownloadError;
pub use executor::download_video;
pub use metadata::fetch_metadata;
pub use models::{DownloadResult, SourceMetadata, StreamCandidate, VideoMetadata, VideoReference};
pub use providers::{ProviderConfig, StreamProvider, YtDlpProvider};
pub use storage::{DownloadStore, DOWNLOAD_DIR};
