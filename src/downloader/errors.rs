// Error types shared by the metadata fetcher and download executor

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadError {
    /// Input failed the YouTube URL pattern; no remote call was made
    InvalidUrl(String),

    /// Video does not exist, is private, or is geo/age-restricted
    VideoUnavailable(String),

    /// HTTP-level failure fetching the manifest or the stream bytes
    Transport {
        status: Option<u16>,
        reason: String,
    },

    /// The extractor tool reported its own error (unsupported/changed site)
    Provider(String),

    /// Extractor output could not be parsed
    ParseError(String),

    /// yt-dlp (or the configured extractor) is not installed
    ToolNotFound(String),

    /// Valid video but no progressive MP4 stream exists
    NoSuitableStream,

    /// Download-directory creation/deletion or file write failed
    Filesystem(String),

    /// Anything else
    Unexpected(String),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(url) => write!(f, "Invalid YouTube URL: {}", url),
            Self::VideoUnavailable(reason) => write!(f, "Video unavailable: {}", reason),
            Self::Transport { status: Some(code), reason } => {
                write!(f, "HTTP error {}: {}", code, reason)
            }
            Self::Transport { status: None, reason } => {
                write!(f, "Network error: {}", reason)
            }
            Self::Provider(msg) => write!(f, "Extractor error: {}", msg),
            Self::ParseError(msg) => write!(f, "Parse error: {}", msg),
            Self::ToolNotFound(tool) => write!(f, "Tool not found: {}", tool),
            Self::NoSuitableStream => write!(f, "No suitable stream found"),
            Self::Filesystem(msg) => write!(f, "Filesystem error: {}", msg),
            Self::Unexpected(msg) => write!(f, "Unexpected error: {}", msg),
        }
    }
}

impl std::error::Error for DownloadError {}

impl From<std::io::Error> for DownloadError {
    fn from(e: std::io::Error) -> Self {
        Self::Filesystem(e.to_string())
    }
}

/// Classify raw extractor stderr into the taxonomy.
///
/// yt-dlp reports everything as free text on stderr, so the mapping is
/// substring-based. Availability patterns are checked before transport ones
/// because an unavailable video often also carries an HTTP status line.
impl From<String> for DownloadError {
    fn from(s: String) -> Self {
        let lower = s.to_lowercase();

        // Availability failures
        if lower.contains("private video")
            || lower.contains("video unavailable")
            || lower.contains("has been removed")
            || lower.contains("not available in your country")
            || lower.contains("age-restricted")
            || lower.contains("sign in to confirm your age")
            || lower.contains("members-only")
        {
            return Self::VideoUnavailable(first_line(&s));
        }

        // Transport failures, with the status code when yt-dlp echoes one
        if let Some((code, reason)) = parse_http_error(&s) {
            return Self::Transport {
                status: Some(code),
                reason,
            };
        }
        if lower.contains("timed out")
            || lower.contains("timeout")
            || lower.contains("connection refused")
            || lower.contains("unable to download")
        {
            return Self::Transport {
                status: None,
                reason: first_line(&s),
            };
        }

        // Tool not found
        if lower.contains("not found")
            || lower.contains("no such file")
            || lower.contains("command not found")
        {
            return Self::ToolNotFound(first_line(&s));
        }

        // Parse errors
        if lower.contains("json") || lower.contains("parse") {
            return Self::ParseError(first_line(&s));
        }

        // yt-dlp's own ERROR: lines that matched nothing above
        if s.contains("ERROR:") {
            return Self::Provider(first_line(&s));
        }

        Self::Unexpected(first_line(&s))
    }
}

/// Extract `HTTP Error <code>: <reason>` from yt-dlp output.
fn parse_http_error(s: &str) -> Option<(u16, String)> {
    let idx = s.find("HTTP Error ")?;
    let rest = &s[idx + "HTTP Error ".len()..];
    let code: u16 = rest
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .ok()?;
    let reason = rest
        .splitn(2, ':')
        .nth(1)
        .map(|r| r.lines().next().unwrap_or("").trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "request failed".to_string());
    Some((code, reason))
}

fn first_line(s: &str) -> String {
    s.lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .trim()
        .to_string()
}
