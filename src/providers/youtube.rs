use anyhow::Context;
use async_trait::async_trait;
use regex::Regex;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use super::{TranscriptEntry, TranscriptProvider};
use crate::Result;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Mimic a browser to avoid the consent interstitial and bot detection.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Primary transcript provider: scrapes the watch page for the embedded
/// player response and fetches the caption track as timed JSON.
pub struct YoutubePageProvider {
    client: Client,
}

impl YoutubePageProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String> {
        let url = format!("{}{}", WATCH_URL, video_id);
        tracing::debug!("Fetching watch page: {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            anyhow::bail!("YouTube is blocking requests from this IP (HTTP 429)");
        }
        if !response.status().is_success() {
            anyhow::bail!("Video not found or unavailable: HTTP {}", response.status());
        }

        Ok(response.text().await?)
    }
}

/// Extract the `ytInitialPlayerResponse` JSON embedded in the watch page.
fn extract_player_response(html: &str) -> Result<Value> {
    let pattern = Regex::new(r"var ytInitialPlayerResponse\s*=\s*(\{.+?\});")?;

    let captures = pattern
        .captures(html)
        .context("could not locate the player response in the watch page")?;
    let json = captures
        .get(1)
        .context("player response capture group is empty")?
        .as_str();

    serde_json::from_str(json).context("failed to deserialize the player response")
}

/// Resolve the caption track URL from a player response, preferring an
/// English track and falling back to whatever is listed first.
fn caption_track_url(player: &Value) -> Result<String> {
    if let Some(status) = player
        .pointer("/playabilityStatus/status")
        .and_then(Value::as_str)
    {
        if status == "ERROR" {
            let reason = player
                .pointer("/playabilityStatus/reason")
                .and_then(Value::as_str)
                .unwrap_or("no reason given");
            anyhow::bail!("Video unavailable: {}", reason);
        }
    }

    let tracks = player
        .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")
        .and_then(Value::as_array)
        .filter(|tracks| !tracks.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Subtitles are disabled for this video"))?;

    let track = tracks
        .iter()
        .find(|track| {
            track
                .get("languageCode")
                .and_then(Value::as_str)
                .map_or(false, |code| code.starts_with("en"))
        })
        .unwrap_or(&tracks[0]);

    let base_url = track
        .get("baseUrl")
        .and_then(Value::as_str)
        .context("caption track has no base URL")?;

    Ok(format!("{}&fmt=json3", base_url))
}

#[derive(Debug, Deserialize)]
struct TimedTextResponse {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
struct TimedTextEvent {
    #[serde(default)]
    segs: Vec<TimedTextSeg>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSeg {
    #[serde(default)]
    utf8: String,
}

#[async_trait]
impl TranscriptProvider for YoutubePageProvider {
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptEntry>> {
        let html = self.fetch_watch_page(video_id).await?;
        let player = extract_player_response(&html)?;
        let caption_url = caption_track_url(&player)?;

        tracing::debug!("Fetching timed captions: {}", caption_url);
        let payload = self
            .client
            .get(&caption_url)
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?
            .error_for_status()
            .context("caption track fetch failed")?
            .text()
            .await?;

        let timed: TimedTextResponse =
            serde_json::from_str(&payload).context("failed to parse the timed caption payload")?;

        let entries = timed
            .events
            .into_iter()
            .flat_map(|event| event.segs)
            .filter(|seg| !seg.utf8.trim().is_empty())
            .map(|seg| TranscriptEntry {
                text: seg.utf8.trim().to_string(),
            })
            .collect();

        Ok(entries)
    }
}

impl Default for YoutubePageProvider {
    fn default() -> Self {
        Self::new()
    }
}
