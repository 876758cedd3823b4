// yt-dlp backed StreamProvider
//
// Metadata and stream listing come from one `yt-dlp --dump-json` invocation
// run under a timeout; retrieval streams the format's direct media URL over
// HTTP straight to disk. yt-dlp only ever sees URLs that already passed the
// offline validator.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use time::macros::format_description;
use time::Date;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info};

use super::traits::{ProviderConfig, StreamProvider};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::{SourceMetadata, StreamCandidate};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// CLI-based provider using the yt-dlp binary.
pub struct YtDlpProvider {
    ytdlp_path: String,
}

impl YtDlpProvider {
    pub fn new() -> Self {
        Self {
            ytdlp_path: Self::find_ytdlp(),
        }
    }

    /// Find the yt-dlp binary, preferring well-known install locations.
    fn find_ytdlp() -> String {
        let common_paths = [
            "/opt/homebrew/bin/yt-dlp",
            "/usr/local/bin/yt-dlp",
            "/usr/bin/yt-dlp",
        ];

        for path in common_paths {
            if Path::new(path).exists() {
                return path.to_string();
            }
        }

        // Fall back to PATH resolution
        "yt-dlp".to_string()
    }

    fn build_args(&self, url: &str, config: &ProviderConfig) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            config.timeout_seconds.to_string(),
            "--user-agent".to_string(),
            USER_AGENT.to_string(),
        ];

        if let Some(proxy) = &config.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args.push(url.to_string());
        args
    }

    /// One full extraction: metadata bundle plus stream list.
    async fn extract(
        &self,
        url: &str,
        config: &ProviderConfig,
    ) -> Result<(SourceMetadata, Vec<StreamCandidate>), DownloadError> {
        if !self.is_available() {
            return Err(DownloadError::ToolNotFound(
                "yt-dlp binary not found".to_string(),
            ));
        }

        let args = self.build_args(url, config);
        debug!("running {} {}", self.ytdlp_path, args.join(" "));

        let output =
            run_with_timeout(&self.ytdlp_path, &args, config.timeout_seconds + 5).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            error!("yt-dlp failed for {}: {}", url, stderr.trim());
            return Err(DownloadError::from(stderr));
        }

        parse_dump_json(&output.stdout)
    }

    fn http_client(&self, config: &ProviderConfig) -> Result<reqwest::Client, DownloadError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(config.timeout_seconds));

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                DownloadError::Unexpected(format!("invalid proxy {}: {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|e| DownloadError::Unexpected(format!("http client: {}", e)))
    }
}

impl Default for YtDlpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StreamProvider for YtDlpProvider {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    fn is_available(&self) -> bool {
        match std::process::Command::new(&self.ytdlp_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) => status.success(),
            Err(_) => false,
        }
    }

    async fn check_availability(
        &self,
        url: &str,
        config: &ProviderConfig,
    ) -> Result<(), DownloadError> {
        self.extract(url, config).await.map(|_| ())
    }

    async fn fetch_metadata(
        &self,
        url: &str,
        config: &ProviderConfig,
    ) -> Result<SourceMetadata, DownloadError> {
        let (metadata, _) = self.extract(url, config).await?;
        Ok(metadata)
    }

    async fn list_streams(
        &self,
        url: &str,
        config: &ProviderConfig,
    ) -> Result<Vec<StreamCandidate>, DownloadError> {
        let (_, streams) = self.extract(url, config).await?;
        Ok(streams)
    }

    async fn retrieve_stream(
        &self,
        stream: &StreamCandidate,
        dest: &Path,
        config: &ProviderConfig,
    ) -> Result<(), DownloadError> {
        let media_url = stream.url.as_deref().ok_or_else(|| {
            DownloadError::Provider(format!(
                "format {} has no direct media URL",
                stream.format_id
            ))
        })?;

        let client = self.http_client(config)?;
        let response = client.get(media_url).send().await.map_err(|e| {
            DownloadError::Transport {
                status: None,
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Transport {
                status: Some(status.as_u16()),
                reason: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            });
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut response = response;
        let mut written: u64 = 0;
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            DownloadError::Transport {
                status: None,
                reason: e.to_string(),
            }
        })? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        info!(
            "retrieved format {} ({} bytes) to {}",
            stream.format_id,
            written,
            dest.display()
        );
        Ok(())
    }
}

/// Run a command, capturing stdout/stderr, killing it past the deadline.
async fn run_with_timeout(
    program: &str,
    args: &[String],
    timeout_secs: u64,
) -> Result<std::process::Output, DownloadError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                DownloadError::ToolNotFound(program.to_string())
            }
            _ => DownloadError::Unexpected(format!("failed to start {}: {}", program, e)),
        })?;

    let mut stdout_pipe = child.stdout.take().ok_or_else(|| {
        DownloadError::Unexpected(format!("failed to capture stdout from {}", program))
    })?;
    let mut stderr_pipe = child.stderr.take().ok_or_else(|| {
        DownloadError::Unexpected(format!("failed to capture stderr from {}", program))
    })?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });

    match timeout(Duration::from_secs(timeout_secs), child.wait()).await {
        Ok(status_res) => {
            let status = status_res
                .map_err(|e| DownloadError::Unexpected(format!("wait for {}: {}", program, e)))?;
            let stdout = stdout_task
                .await
                .map_err(|e| DownloadError::Unexpected(format!("stdout task: {}", e)))?
                .map_err(|e| DownloadError::Unexpected(format!("read stdout: {}", e)))?;
            let stderr = stderr_task
                .await
                .map_err(|e| DownloadError::Unexpected(format!("stderr task: {}", e)))?
                .map_err(|e| DownloadError::Unexpected(format!("read stderr: {}", e)))?;
            Ok(std::process::Output {
                status,
                stdout,
                stderr,
            })
        }
        Err(_) => {
            let _ = child.kill().await;
            stdout_task.abort();
            stderr_task.abort();
            Err(DownloadError::Transport {
                status: None,
                reason: format!("{} timed out after {}s", program, timeout_secs),
            })
        }
    }
}

/// Parse `yt-dlp --dump-json` output into the provider models.
fn parse_dump_json(
    stdout: &[u8],
) -> Result<(SourceMetadata, Vec<StreamCandidate>), DownloadError> {
    let json_str = String::from_utf8_lossy(stdout);
    let json: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| DownloadError::ParseError(format!("invalid JSON: {}", e)))?;

    let metadata = SourceMetadata {
        id: json["id"].as_str().unwrap_or("unknown").to_string(),
        title: json["title"]
            .as_str()
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty()),
        uploader: json["uploader"]
            .as_str()
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty()),
        duration_seconds: json["duration"].as_f64().unwrap_or(0.0) as u64,
        view_count: json["view_count"].as_u64(),
        upload_date: json["upload_date"].as_str().and_then(parse_upload_date),
    };

    let streams = parse_formats(&json)?;

    Ok((metadata, streams))
}

/// yt-dlp reports upload dates as `YYYYMMDD`.
fn parse_upload_date(raw: &str) -> Option<Date> {
    let format = format_description!("[year][month][day]");
    Date::parse(raw, format).ok()
}

fn parse_formats(json: &serde_json::Value) -> Result<Vec<StreamCandidate>, DownloadError> {
    let formats_array = json["formats"]
        .as_array()
        .ok_or_else(|| DownloadError::ParseError("no formats array in JSON".to_string()))?;

    let mut streams = Vec::new();

    for f in formats_array {
        let vcodec = f["vcodec"].as_str();
        let acodec = f["acodec"].as_str();
        let has_video = vcodec.map_or(false, |v| v != "none" && !v.is_empty());
        let has_audio = acodec.map_or(false, |a| a != "none" && !a.is_empty());

        streams.push(StreamCandidate {
            format_id: f["format_id"].as_str().unwrap_or("").to_string(),
            ext: f["ext"].as_str().unwrap_or("").to_string(),
            height: f["height"].as_u64().map(|h| h as u32),
            progressive: has_video && has_audio,
            filesize: f["filesize"].as_u64().or_else(|| f["filesize_approx"].as_u64()),
            url: f["url"].as_str().map(|s| s.to_string()),
        });
    }

    Ok(streams)
}
