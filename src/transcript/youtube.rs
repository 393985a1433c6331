use async_trait::async_trait;
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE};
use reqwest::{Client, StatusCode};
use url::Url;

use super::{parser, CaptionTrack, FetchedTranscript, ProviderError, TranscriptProvider};
use crate::utils::watch_page_url;

/// Pre-accepted consent so EU requests get the watch page instead of the consent form
const CONSENT_COOKIE: &str = "CONSENT=YES+cb";

/// Transcript provider scraping YouTube's watch page and timed-text endpoint
pub struct YoutubeTranscriptProvider {
    client: Client,
    watch_url: String,
    accept_language: String,
}

impl YoutubeTranscriptProvider {
    pub fn new(client: Client, watch_url: impl Into<String>, accept_language: impl Into<String>) -> Self {
        Self {
            client,
            watch_url: watch_url.into(),
            accept_language: accept_language.into(),
        }
    }

    /// Download the watch page HTML
    async fn fetch_watch_html(&self, video_id: &str) -> Result<String, ProviderError> {
        let url = watch_page_url(&self.watch_url, video_id);
        tracing::debug!("Fetching watch page: {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT_LANGUAGE, self.accept_language.as_str())
            .header(COOKIE, CONSENT_COOKIE)
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::TooManyRequests);
        }

        Ok(response.error_for_status()?.text().await?)
    }

    /// Download the timed-text document of a track
    async fn fetch_timedtext(&self, track: &CaptionTrack) -> Result<String, ProviderError> {
        let url = timedtext_url(&track.base_url)?;
        tracing::debug!("Fetching {} track: {}", track.language_code, url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT_LANGUAGE, self.accept_language.as_str())
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::TooManyRequests);
        }

        Ok(response.error_for_status()?.text().await?)
    }
}

/// Track URL with any `fmt` override removed, so the classic XML format is served
fn timedtext_url(base_url: &str) -> Result<Url, ProviderError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| anyhow::anyhow!("Invalid caption track URL {}: {}", base_url, e))?;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "fmt")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    Ok(url)
}

#[async_trait]
impl TranscriptProvider for YoutubeTranscriptProvider {
    async fn fetch_transcript(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<FetchedTranscript, ProviderError> {
        let tracks = self.list_tracks(video_id).await?;
        let track = parser::select_track(&tracks, languages)?;

        tracing::info!(
            "Selected caption track: {} ({}{})",
            track.name,
            track.language_code,
            if track.is_generated { ", auto-generated" } else { "" }
        );

        let xml = self.fetch_timedtext(track).await?;
        let entries = parser::parse_timedtext(&xml)?;

        Ok(FetchedTranscript {
            language: track.name.clone(),
            language_code: track.language_code.clone(),
            is_generated: track.is_generated,
            entries,
        })
    }

    async fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>, ProviderError> {
        let html = self.fetch_watch_html(video_id).await?;
        let tracks = parser::extract_caption_tracks(&html)?;
        tracing::debug!("Found {} caption tracks for {}", tracks.len(), video_id);
        Ok(tracks)
    }

    fn provider_name(&self) -> &'static str {
        "YouTube"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timedtext_url_strips_format() {
        let url = timedtext_url("https://www.youtube.com/api/timedtext?v=abc&fmt=srv3&lang=en").unwrap();
        assert_eq!(url.as_str(), "https://www.youtube.com/api/timedtext?v=abc&lang=en");

        let url = timedtext_url("https://www.youtube.com/api/timedtext?fmt=json3").unwrap();
        assert_eq!(url.as_str(), "https://www.youtube.com/api/timedtext");
    }

    #[test]
    fn test_timedtext_url_rejects_garbage() {
        assert!(matches!(timedtext_url("not a url"), Err(ProviderError::Other(_))));
    }
}
