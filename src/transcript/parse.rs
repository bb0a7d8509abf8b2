use anyhow::{Context, Result};
use serde_json::Value;

use super::catalog::CaptionFormat;

/// Parse a timed-JSON caption payload (json3/srv3) into flat text.
///
/// Every event's segments are walked in order; missing text fields are
/// treated as empty and dropped. A payload that is not valid JSON at all
/// is a hard failure and propagates to the caller.
pub fn parse_timed_json(payload: &str) -> Result<String> {
    let data: Value =
        serde_json::from_str(payload).context("caption payload is not valid timed JSON")?;

    let mut chunks: Vec<&str> = Vec::new();
    for event in data.get("events").and_then(Value::as_array).into_iter().flatten() {
        for seg in event.get("segs").and_then(Value::as_array).into_iter().flatten() {
            let text = seg.get("utf8").and_then(Value::as_str).unwrap_or("").trim();
            if !text.is_empty() {
                chunks.push(text);
            }
        }
    }

    Ok(chunks.join(" "))
}

/// Parse a line-based subtitle payload (VTT, SRT and friends) into flat
/// text by dropping structural lines: blanks, the WEBVTT header, timing
/// cues and bare sequence counters. Tolerant enough that a plain text
/// blob degrades to itself.
pub fn parse_line_based(payload: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();

    for line in payload.lines() {
        let stripped = line.trim();
        if stripped.is_empty() {
            continue;
        }
        if stripped.starts_with("WEBVTT") {
            continue;
        }
        if stripped.contains("-->") {
            continue;
        }
        if stripped.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        kept.push(stripped);
    }

    kept.join(" ")
}

/// Parse a raw caption payload according to its track format and normalize
/// the result. json3/srv3 dispatch to the timed-JSON parser; every other
/// format, known or not, goes through the line-based parser.
pub fn parse_payload(format: &CaptionFormat, payload: &str) -> Result<String> {
    let text = if format.is_timed_json() {
        parse_timed_json(payload)?
    } else {
        parse_line_based(payload)
    };

    Ok(normalize_transcript(&text))
}

/// Post-processing shared by both parse paths: decode HTML entities,
/// collapse embedded newlines to spaces and trim. An empty result means
/// "no usable transcript", which the caller treats as absence, not error.
pub fn normalize_transcript(text: &str) -> String {
    html_escape::decode_html_entities(text)
        .replace('\n', " ")
        .trim()
        .to_string()
}
