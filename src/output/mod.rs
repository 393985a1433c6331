use anyhow::Result;
use console::style;
use serde::Serialize;
use std::fmt::Write;

use crate::cli::OutputFormat;
use crate::lookup::{ErrorKind, LookupResult};
use crate::transcript::{join_text, CaptionTrack};
use crate::utils::{format_duration, truncate_preview};

/// Structured summary printed under every report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugRecord {
    pub video_id: String,
    pub transcript_length: usize,
    pub available_languages: Vec<String>,
    pub error: String,
}

impl DebugRecord {
    pub fn new(video_id: &str, result: &LookupResult) -> Self {
        match result {
            LookupResult::Success { entries, languages } => Self {
                video_id: video_id.to_string(),
                transcript_length: join_text(entries).chars().count(),
                available_languages: languages.iter().cloned().collect(),
                error: "None".to_string(),
            },
            LookupResult::Failure { detail, .. } => Self {
                video_id: video_id.to_string(),
                transcript_length: 0,
                available_languages: Vec::new(),
                error: detail.clone(),
            },
        }
    }
}

#[derive(Serialize)]
struct JsonReport {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<String>,
    debug: DebugRecord,
}

/// Render a lookup result as a human readable report
pub fn format_as_text(video_id: &str, result: &LookupResult, preview_chars: usize) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Attempting to fetch transcript for video ID: {}", video_id)?;
    writeln!(out)?;

    match result {
        LookupResult::Success { entries, languages } => {
            let full_text = join_text(entries);
            let covered = entries
                .last()
                .map(|entry| entry.start + entry.duration)
                .unwrap_or(0.0);

            writeln!(out, "{}", style("Transcript fetched successfully!").green().bold())?;
            writeln!(out)?;
            writeln!(out, "{}", style("Available Languages:").bold())?;
            writeln!(out, "{}", languages.iter().cloned().collect::<Vec<_>>().join(", "))?;
            writeln!(out)?;
            writeln!(out, "Entries: {} (covering {})", entries.len(), format_duration(covered))?;
            writeln!(out)?;
            writeln!(out, "{}", style(format!("Transcript (first {} characters):", preview_chars)).bold())?;
            writeln!(out, "{}", truncate_preview(&full_text, preview_chars))?;
        }
        LookupResult::Failure { kind, detail } => {
            writeln!(out, "{}", style("Failed to fetch transcript").red().bold())?;
            writeln!(out)?;
            writeln!(out, "{} ({})", style("Error details:").bold(), kind)?;
            writeln!(out, "{}", detail)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", style("Debug Information:").bold())?;
    write!(out, "{}", serde_json::to_string_pretty(&DebugRecord::new(video_id, result))?)?;

    Ok(out)
}

/// Render a lookup result as a JSON document
pub fn format_as_json(video_id: &str, result: &LookupResult, preview_chars: usize) -> Result<String> {
    let report = match result {
        LookupResult::Success { entries, .. } => JsonReport {
            status: "success",
            kind: None,
            preview: Some(truncate_preview(&join_text(entries), preview_chars)),
            debug: DebugRecord::new(video_id, result),
        },
        LookupResult::Failure { kind, .. } => JsonReport {
            status: "failure",
            kind: Some(*kind),
            preview: None,
            debug: DebugRecord::new(video_id, result),
        },
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

/// Render a caption track listing
pub fn format_tracks(video_id: &str, provider: &str, tracks: &[CaptionTrack]) -> String {
    let mut lines = vec![format!("{} caption tracks for {}:", provider, video_id)];

    for track in tracks {
        lines.push(format!(
            "  • {} [{}]{}",
            track.name,
            track.language_code,
            if track.is_generated { " (auto-generated)" } else { "" }
        ));
    }

    lines.join("\n")
}

/// Print lookup result to console
pub fn print_to_console(
    video_id: &str,
    result: &LookupResult,
    format: &OutputFormat,
    preview_chars: usize,
) -> Result<()> {
    let content = match format {
        OutputFormat::Text => format_as_text(video_id, result, preview_chars)?,
        OutputFormat::Json => format_as_json(video_id, result, preview_chars)?,
    };

    println!("{}", content);
    Ok(())
}
