use async_trait::async_trait;
use std::time::Duration;

pub mod youtube;
pub mod ytdlp;

use crate::transcript::catalog::CaptionListing;
use crate::Result;

/// One timed caption entry from the primary provider. Only the plain text
/// matters downstream; timing is discarded at this boundary.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub text: String,
}

/// Primary transcript capability: fetch the timed transcript entries for a
/// video identifier. Failure messages from implementations are expected to
/// carry the substrings the orchestrator's classifier looks for
/// ("disabled", "unavailable", "blocking requests", ...).
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptEntry>>;
}

/// Fallback caption capability: enumerate the caption tracks available for
/// a video and fetch a selected track's raw payload.
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    /// List all caption tracks the provider knows about, human-authored
    /// and auto-generated alike.
    async fn list_caption_tracks(&self, video_id: &str) -> Result<CaptionListing>;

    /// Fetch a raw caption payload. The timeout is mandatory: caption
    /// hosts occasionally hang and this is the only unbounded wait in the
    /// fallback chain.
    async fn fetch_raw(&self, url: &str, timeout: Duration) -> Result<String>;
}
