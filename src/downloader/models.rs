// Common data models for the download core

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::Date;

/// A validated, normalized pointer to a single video.
///
/// Constructed only through [`crate::downloader::url::VideoReference::parse`],
/// so holding one proves the raw input passed the URL gate. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoReference {
    /// Canonical watch URL, or the raw input when no id was extractable
    pub url: String,
    /// 11-character video id, when one was found
    pub video_id: Option<String>,
}

/// Raw metadata as the extractor reports it, before display defaulting.
///
/// Every field may be absent; the metadata fetcher decides the placeholders.
#[derive(Debug, Clone, Default)]
pub struct SourceMetadata {
    pub id: String,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub duration_seconds: u64,
    pub view_count: Option<u64>,
    pub upload_date: Option<Date>,
}

/// Display-ready video metadata handed to the presentation layer.
///
/// Produced fresh on every fetch, never cached. All fields are already
/// formatted strings; missing provider values arrive here as placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub author: String,
    /// `M:SS` with zero-padded seconds
    pub length: String,
    /// Thousands-separated view count, or "Unknown"
    pub views: String,
    /// `YYYY-MM-DD`, or "Unknown"
    pub publish_date: String,
}

/// One quality/container variant of a video's media, as listed by the
/// extractor. Transient per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamCandidate {
    /// Extractor-side format id (e.g. "22")
    pub format_id: String,
    /// Container extension (mp4, webm, m4a)
    pub ext: String,
    /// Video height in pixels, when known
    pub height: Option<u32>,
    /// Audio and video muxed in a single file
    pub progressive: bool,
    /// File size in bytes, when the extractor reports one
    pub filesize: Option<u64>,
    /// Direct media URL for retrieval
    pub url: Option<String>,
}

impl StreamCandidate {
    /// Resolution label used in filenames and log lines (e.g. "720p").
    pub fn resolution_label(&self) -> String {
        match self.height {
            Some(h) => format!("{}p", h),
            None => "unknown".to_string(),
        }
    }
}

/// Outcome of one download attempt, for display and logging. Ephemeral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResult {
    pub success: bool,
    /// Resolved path on success, human-readable error message on failure
    pub message: String,
    pub path: Option<PathBuf>,
}

impl DownloadResult {
    pub fn completed(path: PathBuf) -> Self {
        Self {
            success: true,
            message: path.display().to_string(),
            path: Some(path),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            path: None,
        }
    }
}
