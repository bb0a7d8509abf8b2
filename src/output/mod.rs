use anyhow::Result;
use std::path::Path;

use crate::cli::{ExcerptFormat, TranscriptFormat};
use crate::summarize::Excerpt;
use crate::transcript::Acquisition;

/// Render an acquisition in the requested format.
pub fn format_transcript(acquisition: &Acquisition, format: &TranscriptFormat) -> Result<String> {
    let content = match format {
        TranscriptFormat::Text => acquisition.transcript.clone(),
        TranscriptFormat::Json => serde_json::to_string_pretty(acquisition)?,
    };

    Ok(content)
}

/// Render a list of excerpts in the requested format.
pub fn format_excerpts(excerpts: &[Excerpt], format: &ExcerptFormat) -> Result<String> {
    let content = match format {
        ExcerptFormat::Markdown => {
            let sections: Vec<String> = excerpts
                .iter()
                .map(|excerpt| format!("# {}\n\n{}", excerpt.title, excerpt.content))
                .collect();
            sections.join("\n\n")
        }
        ExcerptFormat::Json => serde_json::to_string_pretty(excerpts)?,
    };

    Ok(content)
}

/// Save rendered content to a file.
pub async fn save_to_file(content: &str, path: &Path) -> Result<()> {
    fs_err::write(path, content)?;
    Ok(())
}

/// Print rendered content to the console.
pub fn print_to_console(content: &str) {
    println!("{}", content);
}
