use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Transcript acquisition settings
    pub transcript: TranscriptConfig,

    /// Summarizer settings
    pub summarizer: SummarizerConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Caption languages tried first, in order, before any other language
    /// present in a video's catalog
    pub preferred_languages: Vec<String>,

    /// Timeout in seconds for fetching a raw caption payload
    pub fetch_timeout_secs: u64,

    /// Optional cookies file handed to yt-dlp for authenticated access
    pub cookies_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// Model identifier sent to the chat API
    pub model: String,

    /// Transcript input is truncated to this many characters
    pub max_input_chars: usize,

    /// Completion token budget
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default output format for the transcript command
    pub default_output_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transcript: TranscriptConfig {
                preferred_languages: vec![
                    "en".to_string(),
                    "en-US".to_string(),
                    "en-GB".to_string(),
                ],
                fetch_timeout_secs: 20,
                cookies_file: None,
            },
            summarizer: SummarizerConfig {
                model: "llama-3.3-70b-versatile".to_string(),
                max_input_chars: 15000,
                max_tokens: 4096,
                temperature: 0.7,
            },
            app: AppConfig {
                default_output_format: "text".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content =
                fs_err::read_to_string(&config_path).context("Failed to read config file")?;

            let config: Config =
                serde_yaml::from_str(&content).context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("transcribai").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.transcript.fetch_timeout_secs == 0 {
            anyhow::bail!("Caption fetch timeout must be at least 1 second");
        }

        if self.summarizer.max_input_chars == 0 {
            anyhow::bail!("Summarizer input limit must be non-zero");
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!(
            "  Preferred Languages: {}",
            self.transcript.preferred_languages.join(", ")
        );
        println!(
            "  Caption Fetch Timeout: {}s",
            self.transcript.fetch_timeout_secs
        );
        if let Some(cookies) = &self.transcript.cookies_file {
            println!("  Cookies File: {}", cookies.display());
        }
        println!("  Summarizer Model: {}", self.summarizer.model);
        println!("  Max Input Chars: {}", self.summarizer.max_input_chars);
        println!("  Default Format: {}", self.app.default_output_format);
    }
}
