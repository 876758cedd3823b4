// Metadata fetcher
//
// Asks the provider for the raw metadata bundle and turns it into the
// display-ready record. This operation never fails from the caller's point
// of view: any provider error becomes the placeholder record, with the
// detail logged and stashed in the context for the debug display.

use time::macros::format_description;
use tracing::{error, info};

use super::context::OpContext;
use super::models::{SourceMetadata, VideoMetadata};
use super::providers::{ProviderConfig, StreamProvider};

const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_AUTHOR: &str = "Unknown Author";
const UNKNOWN: &str = "Unknown";
const ERROR_TITLE: &str = "Error retrieving info";
const NOT_AVAILABLE: &str = "N/A";

/// Fetch and format metadata for an already-validated, normalized URL.
pub async fn fetch_metadata(
    provider: &dyn StreamProvider,
    config: &ProviderConfig,
    ctx: &mut OpContext,
    url: &str,
) -> VideoMetadata {
    match provider.fetch_metadata(url, config).await {
        Ok(source) => {
            info!("fetched metadata for {} via {}", url, provider.name());
            format_metadata(&source)
        }
        Err(e) => {
            error!("error fetching video info for {}: {}", url, e);
            ctx.record_failure(e.to_string());
            VideoMetadata {
                title: ERROR_TITLE.to_string(),
                author: NOT_AVAILABLE.to_string(),
                length: NOT_AVAILABLE.to_string(),
                views: NOT_AVAILABLE.to_string(),
                publish_date: NOT_AVAILABLE.to_string(),
            }
        }
    }
}

/// Apply per-field defaulting and rendering rules.
fn format_metadata(source: &SourceMetadata) -> VideoMetadata {
    let date_format = format_description!("[year]-[month]-[day]");

    VideoMetadata {
        title: source
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        author: source
            .uploader
            .clone()
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        length: format_duration(source.duration_seconds),
        views: match source.view_count {
            // Zero views is indistinguishable from "not reported"
            Some(views) if views > 0 => thousands(views),
            _ => UNKNOWN.to_string(),
        },
        publish_date: source
            .upload_date
            .and_then(|d| d.format(date_format).ok())
            .unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

/// `M:SS` with zero-padded seconds.
fn format_duration(total_seconds: u64) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Locale-style thousands separators (1234567 -> "1,234,567").
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
