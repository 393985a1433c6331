use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod parser;
pub mod youtube;

pub use youtube::YoutubeTranscriptProvider;

/// One timed text segment of a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Spoken text of the segment
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

/// A caption track advertised on the watch page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionTrack {
    /// Timed-text download URL
    pub base_url: String,

    /// Display name, e.g. "English (auto-generated)"
    pub name: String,

    /// Language code, e.g. "en"
    pub language_code: String,

    /// Whether the track was produced by speech recognition
    pub is_generated: bool,
}

/// Transcript returned by a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedTranscript {
    /// Track display name, e.g. "English (auto-generated)"
    pub language: String,
    pub language_code: String,
    pub is_generated: bool,
    pub entries: Vec<TranscriptEntry>,
}

/// Join entry texts with single spaces
pub fn join_text(entries: &[TranscriptEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Failures a transcript provider can report
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("No transcript available for this video.")]
    NoTranscriptAvailable,

    #[error("Transcripts are disabled for this video.")]
    TranscriptsDisabled,

    #[error("No transcript found for this video.")]
    NoTranscriptFound {
        requested: Vec<String>,
        available: Vec<String>,
    },

    #[error("The video is no longer available")]
    VideoUnavailable,

    #[error("YouTube is receiving too many requests from this IP and now requires solving a captcha")]
    TooManyRequests,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Source of transcripts for a video
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Fetch one transcript, honouring `languages` in priority order (empty = provider default)
    async fn fetch_transcript(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<FetchedTranscript, ProviderError>;

    /// List every caption track the video advertises
    async fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>, ProviderError>;

    /// Get the name of this provider
    fn provider_name(&self) -> &'static str;
}
