use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::CaptionProvider;
use crate::transcript::catalog::CaptionListing;
use crate::Result;

/// Fallback caption provider backed by the yt-dlp binary.
///
/// yt-dlp's `--dump-json` output carries `subtitles` and
/// `automatic_captions` maps keyed by language, which is exactly the
/// listing shape the selector's merge step consumes.
pub struct YtDlpCaptionProvider {
    yt_dlp_path: String,
    cookies_file: Option<PathBuf>,
    client: Client,
}

impl YtDlpCaptionProvider {
    pub fn new(cookies_file: Option<PathBuf>) -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
            cookies_file,
            client: Client::new(),
        }
    }

    /// Check if yt-dlp is available
    pub async fn check_availability(&self) -> bool {
        Command::new(&self.yt_dlp_path)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl CaptionProvider for YtDlpCaptionProvider {
    async fn list_caption_tracks(&self, video_id: &str) -> Result<CaptionListing> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);
        tracing::debug!("Listing caption tracks via yt-dlp for: {}", url);

        let mut command = Command::new(&self.yt_dlp_path);
        command.args([
            "--dump-json",
            "--skip-download",
            "--no-playlist",
            "--no-warnings",
        ]);
        if let Some(cookies) = &self.cookies_file {
            command.arg("--cookies").arg(cookies);
        }
        let output = command
            .arg(&url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("failed to run yt-dlp")?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp failed: {}", error);
        }

        let json = String::from_utf8(output.stdout)?;
        let listing: CaptionListing =
            serde_json::from_str(&json).context("failed to parse yt-dlp output")?;

        Ok(listing)
    }

    async fn fetch_raw(&self, url: &str, timeout: Duration) -> Result<String> {
        tracing::debug!("Fetching caption payload: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()
            .context("caption payload fetch failed")?;

        Ok(response.text().await?)
    }
}
