use anyhow::{anyhow, Context};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

use super::{CaptionTrack, ProviderError, TranscriptEntry};

static TEXT_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)").expect("valid text element regex")
});

static TIMING_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(start|dur)="([^"]*)""#).expect("valid attribute regex")
});

/// Caption track as it appears in the player response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCaptionTrack {
    base_url: String,
    #[serde(default)]
    name: Option<RawTrackName>,
    language_code: String,
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrackName {
    simple_text: Option<String>,
    runs: Option<Vec<RawRun>>,
}

#[derive(Debug, Deserialize)]
struct RawRun {
    text: String,
}

impl From<RawCaptionTrack> for CaptionTrack {
    fn from(raw: RawCaptionTrack) -> Self {
        let name = raw
            .name
            .and_then(|name| {
                name.simple_text.or_else(|| {
                    name.runs
                        .map(|runs| runs.into_iter().map(|run| run.text).collect::<String>())
                })
            })
            .unwrap_or_else(|| raw.language_code.clone());

        CaptionTrack {
            base_url: raw.base_url,
            name,
            language_code: raw.language_code,
            is_generated: raw.kind.as_deref() == Some("asr"),
        }
    }
}

/// Extract the caption track list embedded in a watch page
pub fn extract_caption_tracks(html: &str) -> Result<Vec<CaptionTrack>, ProviderError> {
    let Some((_, after)) = html.split_once("\"captions\":") else {
        if html.contains("class=\"g-recaptcha\"") {
            return Err(ProviderError::TooManyRequests);
        }
        if !html.contains("\"playabilityStatus\":") {
            return Err(ProviderError::VideoUnavailable);
        }
        return Err(ProviderError::TranscriptsDisabled);
    };

    // The captions object is followed by the rest of the player response
    let captions: Value = serde_json::Deserializer::from_str(after)
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| anyhow!("Captions JSON is empty"))?
        .context("Failed to parse captions JSON")?;

    let renderer = captions
        .get("playerCaptionsTracklistRenderer")
        .ok_or(ProviderError::TranscriptsDisabled)?;

    let Some(tracks) = renderer.get("captionTracks") else {
        return Err(ProviderError::NoTranscriptAvailable);
    };

    let raw: Vec<RawCaptionTrack> = serde_json::from_value(tracks.clone())
        .context("Failed to parse caption tracks")?;

    if raw.is_empty() {
        return Err(ProviderError::NoTranscriptAvailable);
    }

    Ok(raw.into_iter().map(CaptionTrack::from).collect())
}

/// Pick a track: for each requested language, a manual track beats a generated one.
/// With no preference, the first manual track, else the first track.
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    languages: &[String],
) -> Result<&'a CaptionTrack, ProviderError> {
    if languages.is_empty() {
        return tracks
            .iter()
            .find(|track| !track.is_generated)
            .or_else(|| tracks.first())
            .ok_or(ProviderError::NoTranscriptAvailable);
    }

    for language in languages {
        let matching = |generated: bool| {
            tracks
                .iter()
                .find(|track| track.is_generated == generated && &track.language_code == language)
        };

        if let Some(track) = matching(false).or_else(|| matching(true)) {
            return Ok(track);
        }
    }

    Err(ProviderError::NoTranscriptFound {
        requested: languages.to_vec(),
        available: tracks.iter().map(|track| track.language_code.clone()).collect(),
    })
}

/// Parse a timed-text XML document into ordered entries
pub fn parse_timedtext(xml: &str) -> Result<Vec<TranscriptEntry>, ProviderError> {
    if !xml.contains("<transcript") {
        return Err(anyhow!("Timed-text response has no <transcript> root ({} bytes)", xml.len()).into());
    }

    let mut entries = Vec::new();

    for captures in TEXT_ELEMENT.captures_iter(xml) {
        let Some(body) = captures.get(2).map(|m| m.as_str()).filter(|body| !body.is_empty()) else {
            continue;
        };

        let mut start = 0.0;
        let mut duration = 0.0;
        for attribute in TIMING_ATTRIBUTE.captures_iter(&captures[1]) {
            let value = attribute[2]
                .parse::<f64>()
                .with_context(|| format!("Invalid {} attribute: {}", &attribute[1], &attribute[2]))?;
            match &attribute[1] {
                "start" => start = value,
                _ => duration = value,
            }
        }

        // XML escaping first, then the HTML markup YouTube nests inside captions
        let text = decode_markup(&decode_markup(body));
        if text.trim().is_empty() {
            continue;
        }

        entries.push(TranscriptEntry { text, start, duration });
    }

    Ok(entries)
}

/// Decode entities and drop tags, keeping only text content
fn decode_markup(fragment: &str) -> String {
    Html::parse_fragment(fragment)
        .root_element()
        .text()
        .collect()
}
