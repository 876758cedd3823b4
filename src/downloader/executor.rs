// Download executor
//
// Policy: progressive (muxed) MP4 only, highest resolution, provider order
// breaking ties. No fallback to adaptive or non-MP4 streams, one attempt,
// no retries. Every failure comes back as a DownloadResult message; nothing
// here panics or propagates an error to the presentation layer.

use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{error, info};

use super::context::OpContext;
use super::errors::DownloadError;
use super::models::{DownloadResult, StreamCandidate};
use super::providers::{ProviderConfig, StreamProvider};
use super::storage::DownloadStore;

const TITLE_MAX_CHARS: usize = 50;

/// Download the best progressive MP4 of an already-validated, normalized URL
/// into the store.
pub async fn download_video(
    provider: &dyn StreamProvider,
    config: &ProviderConfig,
    store: &DownloadStore,
    ctx: &mut OpContext,
    url: &str,
) -> DownloadResult {
    match try_download(provider, config, store, url).await {
        Ok((path, resolution)) => {
            info!("downloaded {} ({}) to {}", url, resolution, path.display());
            DownloadResult::completed(path)
        }
        Err(e) => {
            error!("download failed for {}: {}", url, e);
            ctx.record_failure(e.to_string());
            DownloadResult::failed(e.to_string())
        }
    }
}

async fn try_download(
    provider: &dyn StreamProvider,
    config: &ProviderConfig,
    store: &DownloadStore,
    url: &str,
) -> Result<(std::path::PathBuf, String), DownloadError> {
    provider.check_availability(url, config).await?;

    let metadata = provider.fetch_metadata(url, config).await?;
    let streams = provider.list_streams(url, config).await?;

    let stream = select_stream(&streams).ok_or(DownloadError::NoSuitableStream)?;
    let resolution = stream.resolution_label();

    store.ensure()?;
    let filename = derive_filename(metadata.title.as_deref(), &resolution);
    let dest = store.file_path(&filename);

    provider.retrieve_stream(stream, &dest, config).await?;
    Ok((dest, resolution))
}

/// Highest-resolution progressive MP4; ties fall to the provider's own
/// ordering. `None` when the video offers no such stream.
pub fn select_stream(streams: &[StreamCandidate]) -> Option<&StreamCandidate> {
    streams
        .iter()
        .filter(|s| s.progressive && s.ext == "mp4")
        .max_by_key(|s| s.height.unwrap_or(0))
}

/// `<title[:50]>_<resolution>.mp4`, with path separators replaced so the
/// result stays a single filesystem component. A missing title becomes a
/// timestamp placeholder.
pub fn derive_filename(title: Option<&str>, resolution: &str) -> String {
    let stem = match title.filter(|t| !t.is_empty()) {
        Some(t) => t.chars().take(TITLE_MAX_CHARS).collect::<String>(),
        None => {
            let format = format_description!("[year][month][day]_[hour][minute][second]");
            let now = OffsetDateTime::now_utc()
                .format(format)
                .unwrap_or_else(|_| "unknown".to_string());
            format!("video_{}", now)
        }
    };
    format!("{}_{}.mp4", stem, resolution)
        .replace('/', "_")
        .replace('\\', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::providers::fake::FakeProvider;
    use crate::downloader::models::SourceMetadata;

    fn stream(format_id: &str, ext: &str, height: Option<u32>, progressive: bool) -> StreamCandidate {
        StreamCandidate {
            format_id: format_id.to_string(),
            ext: ext.to_string(),
            height,
            progressive,
            filesize: None,
            url: Some(format!("https://example.com/{}", format_id)),
        }
    }

    #[test]
    fn selects_highest_progressive_mp4() {
        let streams = vec![
            stream("18", "mp4", Some(360), true),
            stream("137", "mp4", Some(1080), false), // video-only, excluded
            stream("22", "mp4", Some(720), true),
            stream("43", "webm", Some(720), true), // wrong container, excluded
        ];
        let best = select_stream(&streams).unwrap();
        assert_eq!(best.format_id, "22");
    }

    #[test]
    fn selection_is_none_without_progressive_mp4() {
        let streams = vec![
            stream("137", "mp4", Some(1080), false),
            stream("140", "m4a", None, false),
            stream("43", "webm", Some(360), true),
        ];
        assert!(select_stream(&streams).is_none());
    }

    #[test]
    fn filename_truncates_title_and_appends_resolution() {
        let long_title = "a".repeat(80);
        let name = derive_filename(Some(&long_title), "720p");
        assert_eq!(name, format!("{}_720p.mp4", "a".repeat(50)));
    }

    #[test]
    fn filename_never_contains_path_separators() {
        let name = derive_filename(Some(r"AC/DC \ Live"), "1080p");
        assert!(!name.contains('/'));
        assert!(!name.contains('\\'));
        assert!(name.ends_with("_1080p.mp4"));
    }

    #[test]
    fn missing_title_uses_timestamp_placeholder() {
        let name = derive_filename(None, "360p");
        assert!(name.starts_with("video_"));
        assert!(name.ends_with("_360p.mp4"));
    }

    #[tokio::test]
    async fn no_suitable_stream_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DownloadStore::new(tmp.path().join("downloads"));
        let provider = FakeProvider::new()
            .with_metadata(SourceMetadata {
                title: Some("Some Video".to_string()),
                ..SourceMetadata::default()
            })
            .with_streams(vec![stream("137", "mp4", Some(1080), false)]);
        let mut ctx = OpContext::new();

        let result = download_video(
            &provider,
            &ProviderConfig::default(),
            &store,
            &mut ctx,
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        )
        .await;

        assert!(!result.success);
        assert_eq!(result.message, "No suitable stream found");
        assert!(!store.root().exists() || std::fs::read_dir(store.root()).unwrap().count() == 0);
    }

    #[tokio::test]
    async fn downloads_best_stream_under_derived_name() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DownloadStore::new(tmp.path().join("downloads"));
        let provider = FakeProvider::new()
            .with_metadata(SourceMetadata {
                title: Some("Some Video".to_string()),
                ..SourceMetadata::default()
            })
            .with_streams(vec![
                stream("18", "mp4", Some(360), true),
                stream("22", "mp4", Some(720), true),
            ]);
        let mut ctx = OpContext::new();

        let result = download_video(
            &provider,
            &ProviderConfig::default(),
            &store,
            &mut ctx,
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        )
        .await;

        assert!(result.success, "unexpected failure: {}", result.message);
        let path = result.path.unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "Some Video_720p.mp4"
        );
        assert!(path.is_file());
        assert!(ctx.last_error().is_none());
    }

    #[tokio::test]
    async fn unavailable_video_reports_without_retrieval() {
        let tmp = tempfile::tempdir().unwrap();
        let store = DownloadStore::new(tmp.path().join("downloads"));
        let provider = FakeProvider::failing(DownloadError::VideoUnavailable(
            "Private video".to_string(),
        ));
        let mut ctx = OpContext::new();

        let result = download_video(
            &provider,
            &ProviderConfig::default(),
            &store,
            &mut ctx,
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        )
        .await;

        assert!(!result.success);
        assert!(result.message.contains("Private video"));
        let calls = provider.calls.lock().unwrap();
        assert!(!calls.iter().any(|c| c == "retrieve_stream"));
    }
}
