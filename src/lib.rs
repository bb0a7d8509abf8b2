//! Transcribai - turn YouTube videos into written excerpts
//!
//! This library fetches a video's captions through a primary watch-page
//! provider with a yt-dlp fallback, flattens them into plain transcript
//! text, and can summarize that text into titled excerpts via an LLM.

pub mod cli;
pub mod config;
pub mod output;
pub mod providers;
pub mod summarize;
pub mod transcript;
pub mod utils;

pub use cli::{Cli, Commands, ExcerptFormat, TranscriptFormat};
pub use config::Config;
pub use summarize::{Excerpt, GroqSummarizer, Summarizer};
pub use transcript::{Acquisition, AcquisitionError, TranscriptPipeline};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;
