use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "transcribai",
    about = "Transcribai - Turn YouTube videos into written excerpts",
    version,
    long_about = "Fetches a YouTube video's transcript (with an automatic fallback across caption providers), optionally summarizes it into titled excerpts with an LLM, and writes the result to the console or a file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the plain transcript for a YouTube video
    Transcript {
        /// Video URL (watch, youtu.be, embed or shorts form)
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: TranscriptFormat,
    },

    /// Fetch a transcript and summarize it into titled excerpts
    Summarize {
        /// Video URL (watch, youtu.be, embed or shorts form)
        #[arg(value_name = "URL")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: ExcerptFormat,
    },

    /// Show or manage configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum TranscriptFormat {
    /// Plain text
    Text,
    /// JSON with video id and fetch timestamp
    Json,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum ExcerptFormat {
    /// Markdown sections, one per excerpt
    Markdown,
    /// JSON list of titled excerpts
    Json,
}

impl std::fmt::Display for TranscriptFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptFormat::Text => write!(f, "text"),
            TranscriptFormat::Json => write!(f, "json"),
        }
    }
}

impl std::fmt::Display for ExcerptFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExcerptFormat::Markdown => write!(f, "markdown"),
            ExcerptFormat::Json => write!(f, "json"),
        }
    }
}
