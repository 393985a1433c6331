use anyhow::{Context, Result};
use url::Url;

use crate::config::Config;

/// Validate a URL and return normalized version
pub fn validate_and_normalize_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url)
        .map_err(|_| anyhow::anyhow!("Invalid URL format: {}", url))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("URL must use HTTP or HTTPS protocol");
    }

    Ok(parsed.to_string())
}

/// Build the watch page URL for a video
pub fn watch_page_url(watch_url: &str, video_id: &str) -> String {
    format!("{}?v={}", watch_url, urlencoding::encode(video_id))
}

/// Build the HTTP client shared by the probe and the transcript provider
pub fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.youtube.user_agent.as_str())
        .build()
        .context("Failed to build HTTP client")
}

/// Pull the video ID out of a YouTube URL, or return the trimmed input as-is
pub fn extract_video_id(input: &str) -> String {
    let trimmed = input.trim();

    let parsed = match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url,
        _ => return trimmed.to_string(),
    };

    let host = parsed.host_str().unwrap_or("").to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let id = match host {
        "youtu.be" => segments.first().map(|s| s.to_string()),
        "youtube.com" | "m.youtube.com" | "music.youtube.com" => match segments.as_slice() {
            ["watch", ..] => parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            ["embed" | "shorts" | "v" | "live", id, ..] => Some(id.to_string()),
            _ => None,
        },
        _ => None,
    };

    id.unwrap_or_else(|| trimmed.to_string())
}

/// Truncate to at most `max_chars` characters, appending "..." when shortened
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}
