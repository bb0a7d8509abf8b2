use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

pub mod catalog;
pub mod parse;
pub mod resolve;

use crate::config::Config;
use crate::providers::youtube::YoutubePageProvider;
use crate::providers::ytdlp::YtDlpCaptionProvider;
use crate::providers::{CaptionProvider, TranscriptProvider};

/// Classified transcript acquisition failure.
///
/// Each variant has a distinct, stable user-facing message; every variant
/// except `InvalidInput` also carries the original provider diagnostic,
/// which is for logging only and never shown to users.
#[derive(thiserror::Error, Debug)]
pub enum AcquisitionError {
    #[error("Invalid YouTube URL. Please check the URL format.")]
    InvalidInput,

    #[error("Subtitles are disabled for this video.")]
    CaptionsDisabled(String),

    #[error("Video not found or unavailable.")]
    VideoUnavailable(String),

    #[error(
        "Transcript provider blocked your server IP (common on cloud hosts). \
         This request failed on both primary and fallback methods. \
         Use a proxy-enabled transcript service or residential proxy for production."
    )]
    ProviderBlocked(String),

    #[error("Error fetching transcript: {0}")]
    Unknown(String),
}

impl AcquisitionError {
    /// The original provider diagnostic, for logging.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            AcquisitionError::InvalidInput => None,
            AcquisitionError::CaptionsDisabled(message)
            | AcquisitionError::VideoUnavailable(message)
            | AcquisitionError::ProviderBlocked(message)
            | AcquisitionError::Unknown(message) => Some(message),
        }
    }
}

/// Substrings both known providers emit when an IP is being blocked.
const BLOCKED_MARKERS: [&str; 3] = [
    "requestblocked",
    "ipblocked",
    "youtube is blocking requests",
];

/// Map a primary-provider failure message onto the error taxonomy.
///
/// The substring matching is intentional coupling to two opaque
/// third-party error surfaces; the priority order matters and must not
/// be reshuffled.
pub fn classify_failure(message: &str) -> AcquisitionError {
    let normalized = message.to_lowercase();

    if normalized.contains("disabled") {
        AcquisitionError::CaptionsDisabled(message.to_string())
    } else if normalized.contains("unavailable") || normalized.contains("not found") {
        AcquisitionError::VideoUnavailable(message.to_string())
    } else if BLOCKED_MARKERS
        .iter()
        .any(|marker| normalized.contains(marker))
    {
        AcquisitionError::ProviderBlocked(message.to_string())
    } else {
        AcquisitionError::Unknown(message.to_string())
    }
}

/// Successful acquisition: the flat transcript plus the resolved video id.
#[derive(Debug, Clone, Serialize)]
pub struct Acquisition {
    pub video_id: String,
    pub transcript: String,
    pub fetched_at: DateTime<Utc>,
}

/// Coordinates the primary transcript provider and the fallback caption
/// chain for a single video URL.
///
/// Each `acquire` call is an independent, stateless pipeline: the catalog
/// and track selection are built per call and nothing mutable is shared,
/// so concurrent acquisitions need no synchronization.
pub struct TranscriptPipeline {
    primary: Box<dyn TranscriptProvider>,
    fallback: Box<dyn CaptionProvider>,
    preferred_languages: Vec<String>,
    fetch_timeout: Duration,
}

impl TranscriptPipeline {
    /// Create a pipeline with the real providers.
    pub fn new(config: &Config) -> Self {
        Self::with_providers(
            Box::new(YoutubePageProvider::new()),
            Box::new(YtDlpCaptionProvider::new(
                config.transcript.cookies_file.clone(),
            )),
            config,
        )
    }

    /// Create a pipeline with explicit providers. This is the seam test
    /// doubles plug into.
    pub fn with_providers(
        primary: Box<dyn TranscriptProvider>,
        fallback: Box<dyn CaptionProvider>,
        config: &Config,
    ) -> Self {
        Self {
            primary,
            fallback,
            preferred_languages: config.transcript.preferred_languages.clone(),
            fetch_timeout: Duration::from_secs(config.transcript.fetch_timeout_secs),
        }
    }

    /// Acquire the plain transcript for a video URL.
    ///
    /// The primary provider is tried first; on failure the fallback
    /// caption chain runs, and if it yields non-empty text that wins even
    /// though the primary failed. Only when both paths come up empty is
    /// the *primary* failure classified and surfaced.
    pub async fn acquire(&self, url: &str) -> Result<Acquisition, AcquisitionError> {
        let video_id = resolve::extract_video_id(url).ok_or(AcquisitionError::InvalidInput)?;
        tracing::info!("Acquiring transcript for video: {}", video_id);

        let primary_error = match self.primary.fetch_transcript(video_id).await {
            Ok(entries) => {
                let transcript = entries
                    .iter()
                    .map(|entry| entry.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                tracing::info!("Primary provider returned {} entries", entries.len());
                return Ok(Acquisition {
                    video_id: video_id.to_string(),
                    transcript,
                    fetched_at: Utc::now(),
                });
            }
            Err(error) => error,
        };
        tracing::warn!("Primary transcript provider failed: {:#}", primary_error);

        // Best-effort degrade: any fallback failure is logged and
        // swallowed here, at this single boundary, so it can never mask
        // the primary error.
        match self.acquire_via_fallback(video_id).await {
            Ok(Some(transcript)) => {
                tracing::info!("Fallback caption chain recovered a transcript");
                return Ok(Acquisition {
                    video_id: video_id.to_string(),
                    transcript,
                    fetched_at: Utc::now(),
                });
            }
            Ok(None) => {
                tracing::warn!("Fallback caption chain produced no usable transcript");
            }
            Err(error) => {
                tracing::warn!("Fallback caption chain failed: {:#}", error);
            }
        }

        Err(classify_failure(&format!("{:#}", primary_error)))
    }

    /// The fallback chain: list tracks, merge into a catalog, select the
    /// best track, fetch its payload with an explicit timeout and parse.
    async fn acquire_via_fallback(&self, video_id: &str) -> crate::Result<Option<String>> {
        let listing = self.fallback.list_caption_tracks(video_id).await?;
        let caption_catalog = catalog::build_catalog(&listing);

        let Some(track) = catalog::select_track(&caption_catalog, &self.preferred_languages)
        else {
            return Ok(None);
        };
        tracing::debug!(
            "Selected caption track: language={} format={}",
            track.language,
            track.format.as_str()
        );

        let Some(url) = track.fetchable_url() else {
            return Ok(None);
        };
        let payload = self.fallback.fetch_raw(url, self.fetch_timeout).await?;
        let transcript = parse::parse_payload(&track.format, &payload)?;

        Ok((!transcript.is_empty()).then_some(transcript))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{CaptionProvider, TranscriptEntry, TranscriptProvider};
    use crate::transcript::catalog::{CaptionListing, RawCaptionTrack};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StubPrimary {
        outcome: Result<Vec<&'static str>, &'static str>,
    }

    #[async_trait]
    impl TranscriptProvider for StubPrimary {
        async fn fetch_transcript(&self, _video_id: &str) -> crate::Result<Vec<TranscriptEntry>> {
            match &self.outcome {
                Ok(texts) => Ok(texts
                    .iter()
                    .map(|text| TranscriptEntry {
                        text: (*text).to_string(),
                    })
                    .collect()),
                Err(message) => Err(anyhow::anyhow!(*message)),
            }
        }
    }

    struct StubFallback {
        invocations: Arc<AtomicUsize>,
        listing: Option<CaptionListing>,
        payload: Option<&'static str>,
    }

    impl StubFallback {
        fn failing(invocations: Arc<AtomicUsize>) -> Self {
            Self {
                invocations,
                listing: None,
                payload: None,
            }
        }

        fn with_vtt_track(payload: &'static str) -> Self {
            let mut subtitles = HashMap::new();
            subtitles.insert(
                "en".to_string(),
                vec![RawCaptionTrack {
                    ext: Some("vtt".to_string()),
                    url: Some("https://captions.example/en.vtt".to_string()),
                }],
            );
            Self {
                invocations: Arc::new(AtomicUsize::new(0)),
                listing: Some(CaptionListing {
                    subtitles,
                    automatic_captions: HashMap::new(),
                }),
                payload: Some(payload),
            }
        }
    }

    #[async_trait]
    impl CaptionProvider for StubFallback {
        async fn list_caption_tracks(&self, _video_id: &str) -> crate::Result<CaptionListing> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            self.listing
                .clone()
                .ok_or_else(|| anyhow::anyhow!("yt-dlp failed: simulated"))
        }

        async fn fetch_raw(&self, _url: &str, _timeout: Duration) -> crate::Result<String> {
            self.payload
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("payload fetch failed: simulated"))
        }
    }

    fn pipeline(primary: StubPrimary, fallback: StubFallback) -> TranscriptPipeline {
        TranscriptPipeline::with_providers(
            Box::new(primary),
            Box::new(fallback),
            &Config::default(),
        )
    }

    const WATCH_URL: &str = "https://www.youtube.com/watch?v=abc123";

    #[tokio::test]
    async fn primary_success_never_touches_fallback() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline(
            StubPrimary {
                outcome: Ok(vec!["Hello", "world"]),
            },
            StubFallback::failing(invocations.clone()),
        );

        let acquisition = pipeline.acquire(WATCH_URL).await.unwrap();
        assert_eq!(acquisition.transcript, "Hello world");
        assert_eq!(acquisition.video_id, "abc123");
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fallback_recovers_from_primary_failure() {
        let pipeline = pipeline(
            StubPrimary {
                outcome: Err("primary exploded for unrelated reasons"),
            },
            StubFallback::with_vtt_track(
                "WEBVTT\n\n1\n00:00:01.000 --> 00:00:02.000\nHello world",
            ),
        );

        // The primary failure is discarded, not surfaced.
        let acquisition = pipeline.acquire(WATCH_URL).await.unwrap();
        assert_eq!(acquisition.transcript, "Hello world");
    }

    #[tokio::test]
    async fn blocked_when_both_paths_fail() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline(
            StubPrimary {
                outcome: Err("YouTube is blocking requests from your IP"),
            },
            StubFallback::failing(invocations),
        );

        let error = pipeline.acquire(WATCH_URL).await.unwrap_err();
        assert!(matches!(error, AcquisitionError::ProviderBlocked(_)));
        assert!(error.to_string().contains("proxy"));
    }

    #[tokio::test]
    async fn empty_fallback_text_falls_through_to_classification() {
        let pipeline = pipeline(
            StubPrimary {
                outcome: Err("subtitles are disabled for this video"),
            },
            StubFallback::with_vtt_track("WEBVTT\n\n"),
        );

        let error = pipeline.acquire(WATCH_URL).await.unwrap_err();
        assert!(matches!(error, AcquisitionError::CaptionsDisabled(_)));
    }

    #[tokio::test]
    async fn unrecognizable_url_is_invalid_input() {
        let pipeline = pipeline(
            StubPrimary {
                outcome: Ok(vec![]),
            },
            StubFallback::failing(Arc::new(AtomicUsize::new(0))),
        );

        let error = pipeline.acquire("https://example.com/clip/9").await.unwrap_err();
        assert!(matches!(error, AcquisitionError::InvalidInput));
    }

    #[tokio::test]
    async fn repeated_acquisition_is_deterministic() {
        let first = pipeline(
            StubPrimary {
                outcome: Err("boom"),
            },
            StubFallback::with_vtt_track("WEBVTT\n\nHello\nagain"),
        );
        let second = pipeline(
            StubPrimary {
                outcome: Err("boom"),
            },
            StubFallback::with_vtt_track("WEBVTT\n\nHello\nagain"),
        );

        let a = first.acquire(WATCH_URL).await.unwrap();
        let b = second.acquire(WATCH_URL).await.unwrap();
        assert_eq!(a.transcript, b.transcript);
    }

    #[test]
    fn classification_priority_order() {
        assert!(matches!(
            classify_failure("Subtitles are DISABLED here"),
            AcquisitionError::CaptionsDisabled(_)
        ));
        assert!(matches!(
            classify_failure("Video unavailable"),
            AcquisitionError::VideoUnavailable(_)
        ));
        assert!(matches!(
            classify_failure("transcript not found"),
            AcquisitionError::VideoUnavailable(_)
        ));
        assert!(matches!(
            classify_failure("RequestBlocked by upstream"),
            AcquisitionError::ProviderBlocked(_)
        ));
        assert!(matches!(
            classify_failure("IpBlocked"),
            AcquisitionError::ProviderBlocked(_)
        ));
        assert!(matches!(
            classify_failure("something entirely else"),
            AcquisitionError::Unknown(_)
        ));

        // "disabled" outranks a blocking marker in the same message.
        assert!(matches!(
            classify_failure("captions disabled; also ipblocked"),
            AcquisitionError::CaptionsDisabled(_)
        ));
    }

    #[test]
    fn unknown_preserves_original_message() {
        let error = classify_failure("weird upstream 500");
        assert_eq!(error.diagnostic(), Some("weird upstream 500"));
        assert!(error.to_string().contains("weird upstream 500"));
    }
}
