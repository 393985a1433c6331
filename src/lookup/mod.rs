use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::Config;
use crate::transcript::{ProviderError, TranscriptEntry, TranscriptProvider, YoutubeTranscriptProvider};
use crate::utils::{build_http_client, watch_page_url};
use crate::Result;

/// Named reasons a lookup can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The reachability probe did not return 200
    NotFound,
    NoTranscriptAvailable,
    TranscriptsDisabled,
    NoTranscriptFound,
    /// Anything else, detail carries message and trace
    Unexpected,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "NotFound"),
            ErrorKind::NoTranscriptAvailable => write!(f, "NoTranscriptAvailable"),
            ErrorKind::TranscriptsDisabled => write!(f, "TranscriptsDisabled"),
            ErrorKind::NoTranscriptFound => write!(f, "NoTranscriptFound"),
            ErrorKind::Unexpected => write!(f, "Unexpected"),
        }
    }
}

/// Outcome of a single lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupResult {
    Success {
        entries: Vec<TranscriptEntry>,
        languages: BTreeSet<String>,
    },
    Failure {
        kind: ErrorKind,
        detail: String,
    },
}

impl LookupResult {
    pub fn is_success(&self) -> bool {
        matches!(self, LookupResult::Success { .. })
    }

    fn failure(kind: ErrorKind, detail: impl Into<String>) -> Self {
        LookupResult::Failure {
            kind,
            detail: detail.into(),
        }
    }

    /// Unclassified failure with the full error chain as trace
    fn unexpected(error: anyhow::Error) -> Self {
        Self::failure(
            ErrorKind::Unexpected,
            format!("An error occurred: {}\n\n{:?}", error, error),
        )
    }
}

impl From<ProviderError> for LookupResult {
    fn from(error: ProviderError) -> Self {
        let kind = match &error {
            ProviderError::NoTranscriptAvailable => Some(ErrorKind::NoTranscriptAvailable),
            ProviderError::TranscriptsDisabled => Some(ErrorKind::TranscriptsDisabled),
            ProviderError::NoTranscriptFound { .. } => Some(ErrorKind::NoTranscriptFound),
            _ => None,
        };

        match kind {
            Some(kind) => Self::failure(kind, error.to_string()),
            None => Self::unexpected(error.into()),
        }
    }
}

/// Reachability probe plus transcript retrieval for one video at a time
pub struct TranscriptLookup {
    client: Client,
    watch_url: String,
    languages: Vec<String>,
    assumed_language: String,
    provider: Box<dyn TranscriptProvider>,
}

impl TranscriptLookup {
    /// Create a lookup backed by the YouTube provider
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_http_client(config)?;
        let provider = YoutubeTranscriptProvider::new(
            client.clone(),
            config.youtube.watch_url.clone(),
            config.youtube.accept_language.clone(),
        );

        Ok(Self::with_client(config, client, Box::new(provider)))
    }

    /// Create a lookup with a custom transcript provider
    pub fn with_provider(config: &Config, provider: Box<dyn TranscriptProvider>) -> Result<Self> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(config, client, provider))
    }

    fn with_client(config: &Config, client: Client, provider: Box<dyn TranscriptProvider>) -> Self {
        Self {
            client,
            watch_url: config.youtube.watch_url.clone(),
            languages: config.youtube.languages.clone(),
            assumed_language: config.youtube.assumed_language.clone(),
            provider,
        }
    }

    /// The provider transcripts come from
    pub fn provider(&self) -> &dyn TranscriptProvider {
        self.provider.as_ref()
    }

    /// Probe the watch page, fetch a transcript and classify the outcome.
    /// Never fails: every error becomes a `LookupResult::Failure`.
    pub async fn lookup(&self, video_id: &str) -> LookupResult {
        let video_id = video_id.trim();
        if video_id.is_empty() {
            return LookupResult::unexpected(anyhow::anyhow!("video identifier must not be empty"));
        }

        tracing::info!("Probing watch page for video ID: {}", video_id);
        let status = match self.probe(video_id).await {
            Ok(status) => status,
            Err(error) => return LookupResult::unexpected(error),
        };

        if status != StatusCode::OK {
            tracing::warn!("Watch page for {} returned {}", video_id, status);
            return LookupResult::failure(
                ErrorKind::NotFound,
                format!("Video not found or not accessible. Status code: {}", status.as_u16()),
            );
        }

        tracing::info!("Requesting transcript from {}", self.provider.provider_name());
        let transcript = match self.provider.fetch_transcript(video_id, &self.languages).await {
            Ok(transcript) => transcript,
            Err(error) => {
                tracing::warn!("Transcript lookup for {} failed: {:?}", video_id, error);
                return error.into();
            }
        };

        if transcript.entries.is_empty() {
            tracing::warn!("Caption track {} for {} has no entries", transcript.language, video_id);
            return ProviderError::NoTranscriptAvailable.into();
        }

        let language = if transcript.language_code.trim().is_empty() {
            self.assumed_language.clone()
        } else {
            transcript.language_code
        };

        tracing::info!(
            "Fetched {} transcript entries for {} from track \"{}\" ({}{})",
            transcript.entries.len(),
            video_id,
            transcript.language,
            language,
            if transcript.is_generated { ", auto-generated" } else { "" }
        );

        LookupResult::Success {
            entries: transcript.entries,
            languages: BTreeSet::from([language]),
        }
    }

    /// GET the watch page and report its status
    async fn probe(&self, video_id: &str) -> Result<StatusCode> {
        let url = watch_page_url(&self.watch_url, video_id);
        tracing::debug!("Reachability probe: {}", url);

        let response = self.client.get(&url).send().await?;
        Ok(response.status())
    }
}
