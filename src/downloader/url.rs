// URL validation and normalization
//
// The validator is the sole gate before any remote call: a permissive,
// offline host-pattern check. The normalizer pulls the 11-character video id
// out of whatever query-string noise the user pasted and rebuilds the
// canonical watch URL, falling back to the input unchanged when no id is
// found. Both are pure; the validator additionally logs its verdict.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use super::errors::DownloadError;
use super::models::VideoReference;

lazy_static! {
    // Deliberately permissive: any youtube.com / youtu.be URL with a
    // non-empty path passes. Stray characters after the id are accepted and
    // playlist-qualified URLs are not special-cased; the extractor is the
    // authority on whether the video actually resolves.
    static ref YOUTUBE_URL: Regex =
        Regex::new(r"^(https?://)?(www\.)?(youtube|youtu)\.(com|be)/.+$").unwrap();

    // The 11-character id follows either `v=` or the last path separator
    // (youtu.be/<id>, /embed/<id>, /v/<id>).
    static ref VIDEO_ID: Regex =
        Regex::new(r"(?:v=|/)([A-Za-z0-9_-]{11})").unwrap();
}

/// Offline predicate gating every provider call.
pub fn validate(raw: &str) -> bool {
    let ok = YOUTUBE_URL.is_match(raw);
    if ok {
        debug!("URL accepted: {}", raw);
    } else {
        warn!("URL rejected: {}", raw);
    }
    ok
}

/// Canonicalize to `https://www.youtube.com/watch?v=<id>`.
///
/// Returns the input unchanged when no id can be extracted, so callers must
/// not assume the result is canonical. Idempotent.
pub fn normalize(raw: &str) -> String {
    match extract_video_id(raw) {
        Some(id) => format!("https://www.youtube.com/watch?v={}", id),
        None => raw.to_string(),
    }
}

/// Pull the 11-character video id out of a URL, if present.
pub fn extract_video_id(raw: &str) -> Option<String> {
    VIDEO_ID
        .captures(raw)
        .map(|caps| caps[1].to_string())
}

impl VideoReference {
    /// Gate raw input through validation, then normalize.
    ///
    /// This is the only constructor, so a `VideoReference` always denotes
    /// input that passed the URL pattern.
    pub fn parse(raw: &str) -> Result<Self, DownloadError> {
        if !validate(raw) {
            return Err(DownloadError::InvalidUrl(raw.to_string()));
        }
        Ok(Self {
            url: normalize(raw),
            video_id: extract_video_id(raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_youtube_forms() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/watch?v=dQw4w9WgXcQ&list=PL123",
            "https://youtu.be/dQw4w9WgXcQ?feature=share",
            "www.youtube.com/embed/dQw4w9WgXcQ",
            "youtube.com/v/dQw4w9WgXcQ",
        ] {
            assert!(validate(url), "should accept {}", url);
        }
    }

    #[test]
    fn rejects_non_youtube_input() {
        for url in [
            "",
            "not a url",
            "https://vimeo.com/12345",
            "https://example.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/",
        ] {
            assert!(!validate(url), "should reject {:?}", url);
        }
    }

    #[test]
    fn normalizes_share_link_to_canonical_watch_url() {
        assert_eq!(
            normalize("https://youtu.be/dQw4w9WgXcQ?feature=share"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn strips_trailing_query_parameters() {
        assert_eq!(
            normalize("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s&ab_channel=x"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize("https://youtu.be/dQw4w9WgXcQ?feature=share");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_passes_through_unrecognized_input() {
        assert_eq!(normalize("not a url"), "not a url");
    }

    #[test]
    fn video_reference_rejects_invalid_input() {
        let err = VideoReference::parse("not a url").unwrap_err();
        assert!(matches!(err, DownloadError::InvalidUrl(_)));
    }

    #[test]
    fn video_reference_carries_id_and_canonical_url() {
        let vref = VideoReference::parse("https://youtu.be/dQw4w9WgXcQ?feature=share").unwrap();
        assert_eq!(vref.video_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(vref.url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}
