use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::SummarizerConfig;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Transcripts shorter than this carry too little signal to summarize.
const MIN_TRANSCRIPT_CHARS: usize = 100;

/// One titled excerpt extracted from a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Excerpt {
    pub title: String,
    pub content: String,
}

/// Collaborator that turns plain transcript text into titled excerpts.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &str) -> Result<Vec<Excerpt>>;
}

/// Summarizer backed by Groq's OpenAI-compatible chat completions API.
pub struct GroqSummarizer {
    client: Client,
    api_key: String,
    config: SummarizerConfig,
}

impl GroqSummarizer {
    pub fn new(api_key: String, config: SummarizerConfig) -> Self {
        Self {
            client: Client::new(),
            api_key,
            config,
        }
    }

    /// Create a summarizer with the API key taken from the environment.
    pub fn from_env(config: SummarizerConfig) -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| anyhow::anyhow!("GROQ_API_KEY is not set"))?;
        Ok(Self::new(api_key, config))
    }

    fn build_prompt(&self, transcript: &str) -> String {
        let limited = truncate_chars(transcript, self.config.max_input_chars);

        format!(
            "You are an expert content curator. Extract 3-4 key insights from the \
             following YouTube transcript.\n\n\
             For each insight:\n\
             1. Create a compelling, descriptive title\n\
             2. Extract the exact content verbatim (at least 200-300 words each)\n\
             3. Focus on the most valuable, insightful, or interesting parts\n\n\
             Transcript:\n{}\n\n\
             Respond with a JSON object of the form \
             {{\"insights\": [{{\"title\": \"...\", \"content\": \"...\"}}]}} \
             and nothing else.",
            limited
        )
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ExcerptList {
    insights: Vec<Excerpt>,
}

#[async_trait]
impl Summarizer for GroqSummarizer {
    async fn summarize(&self, transcript: &str) -> Result<Vec<Excerpt>> {
        if transcript.trim().len() < MIN_TRANSCRIPT_CHARS {
            anyhow::bail!("Transcript is too short to generate insights.");
        }

        let prompt = self.build_prompt(transcript);
        let request = ChatRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        tracing::info!("Requesting excerpts from model: {}", self.config.model);
        let response: ChatResponse = self
            .client
            .post(GROQ_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .context("summarizer request failed")?
            .json()
            .await
            .context("failed to parse summarizer response")?;

        let content = response
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .context("summarizer returned no choices")?;

        parse_excerpts(content)
    }
}

/// Parse the model's reply into excerpts, tolerating a fenced JSON block.
fn parse_excerpts(content: &str) -> Result<Vec<Excerpt>> {
    let trimmed = strip_code_fences(content);
    let list: ExcerptList =
        serde_json::from_str(trimmed).context("summarizer reply is not valid excerpt JSON")?;
    Ok(list.insights)
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag after the opening fence.
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.trim().strip_suffix("```").unwrap_or(inner).trim()
}

/// Truncate to a character count without splitting a code point.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
