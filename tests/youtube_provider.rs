use std::collections::BTreeSet;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yt_transcript_debugger::{Config, ErrorKind, LookupResult, TranscriptLookup};

const TIMEDTEXT: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.08" dur="3.2">We&amp;#39;re no strangers to love</text><text start="3.28" dur="2.9">You know the rules</text><text start="6.18" dur="1.1">and so do I</text></transcript>"#;

fn watch_page(captions: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><body><script>var ytInitialPlayerResponse = {{"playabilityStatus":{{"status":"OK"}},{}"videoDetails":{{"videoId":"abc"}}}};</script></body></html>"#,
        captions
    )
}

fn english_captions(server: &MockServer) -> String {
    format!(
        r#""captions":{{"playerCaptionsTracklistRenderer":{{"captionTracks":[{{"baseUrl":"{}/api/timedtext?v=abc&lang=en&fmt=srv3","name":{{"simpleText":"English"}},"languageCode":"en","isTranslatable":true}},{{"baseUrl":"{}/api/timedtext?v=abc&lang=de&kind=asr","name":{{"runs":[{{"text":"German (auto-generated)"}}]}},"languageCode":"de","kind":"asr"}}]}}}},"#,
        server.uri(),
        server.uri()
    )
}

async fn serve_watch_page(server: &MockServer, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path("/watch"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

fn lookup_against(server: &MockServer, languages: &[&str]) -> TranscriptLookup {
    let mut config = Config::default();
    config.youtube.watch_url = format!("{}/watch", server.uri());
    config.youtube.languages = languages.iter().map(|l| l.to_string()).collect();
    TranscriptLookup::new(&config).unwrap()
}

#[tokio::test]
async fn test_public_video_with_english_captions() {
    let server = MockServer::start().await;
    serve_watch_page(&server, 200, watch_page(&english_captions(&server))).await;
    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TIMEDTEXT))
        .expect(1)
        .mount(&server)
        .await;

    let result = lookup_against(&server, &[]).lookup("abc").await;

    match result {
        LookupResult::Success { entries, languages } => {
            assert_eq!(languages, BTreeSet::from(["en".to_string()]));
            assert_eq!(entries.len(), 3);
            assert_eq!(entries[0].text, "We're no strangers to love");
            assert_eq!(entries[2].text, "and so do I");
            assert!(entries.windows(2).all(|pair| pair[0].start < pair[1].start));
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_language_preference_selects_generated_track() {
    let server = MockServer::start().await;
    serve_watch_page(&server, 200, watch_page(&english_captions(&server))).await;
    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .and(query_param("lang", "de"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<transcript><text start="0" dur="1">Hallo</text></transcript>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let result = lookup_against(&server, &["de"]).lookup("abc").await;

    match result {
        LookupResult::Success { entries, languages } => {
            assert_eq!(languages, BTreeSet::from(["de".to_string()]));
            assert_eq!(entries[0].text, "Hallo");
        }
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_captions_disabled() {
    let server = MockServer::start().await;
    serve_watch_page(&server, 200, watch_page("")).await;

    let result = lookup_against(&server, &[]).lookup("abc").await;

    assert_eq!(
        result,
        LookupResult::Failure {
            kind: ErrorKind::TranscriptsDisabled,
            detail: "Transcripts are disabled for this video.".to_string(),
        }
    );
}

#[tokio::test]
async fn test_nonexistent_video() {
    let server = MockServer::start().await;
    serve_watch_page(&server, 404, String::new()).await;

    let result = lookup_against(&server, &[]).lookup("doesnotexist").await;

    assert_eq!(
        result,
        LookupResult::Failure {
            kind: ErrorKind::NotFound,
            detail: "Video not found or not accessible. Status code: 404".to_string(),
        }
    );
}

#[tokio::test]
async fn test_requested_language_missing() {
    let server = MockServer::start().await;
    serve_watch_page(&server, 200, watch_page(&english_captions(&server))).await;

    let result = lookup_against(&server, &["ja"]).lookup("abc").await;

    assert_eq!(
        result,
        LookupResult::Failure {
            kind: ErrorKind::NoTranscriptFound,
            detail: "No transcript found for this video.".to_string(),
        }
    );
}

#[tokio::test]
async fn test_empty_timedtext_is_unexpected() {
    let server = MockServer::start().await;
    serve_watch_page(&server, 200, watch_page(&english_captions(&server))).await;
    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    match lookup_against(&server, &[]).lookup("abc").await {
        LookupResult::Failure { kind, detail } => {
            assert_eq!(kind, ErrorKind::Unexpected);
            assert!(detail.starts_with("An error occurred: "));
            assert!(detail.contains("no <transcript> root"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_list_tracks() {
    let server = MockServer::start().await;
    serve_watch_page(&server, 200, watch_page(&english_captions(&server))).await;

    let lookup = lookup_against(&server, &[]);
    let tracks = lookup.provider().list_tracks("abc").await.unwrap();

    let codes: Vec<_> = tracks.iter().map(|t| (t.language_code.as_str(), t.is_generated)).collect();
    assert_eq!(codes, vec![("en", false), ("de", true)]);
    assert_eq!(lookup.provider().provider_name(), "YouTube");
}

#[tokio::test]
async fn test_empty_timedtext_document_is_not_available() {
    let server = MockServer::start().await;
    serve_watch_page(&server, 200, watch_page(&english_captions(&server))).await;
    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<transcript></transcript>"))
        .expect(1)
        .mount(&server)
        .await;

    let result = lookup_against(&server, &[]).lookup("abc").await;

    assert_eq!(
        result,
        LookupResult::Failure {
            kind: ErrorKind::NoTranscriptAvailable,
            detail: "No transcript available for this video.".to_string(),
        }
    );
}

#[tokio::test]
async fn test_renderer_without_caption_tracks_is_not_available() {
    let server = MockServer::start().await;
    serve_watch_page(
        &server,
        200,
        watch_page(r#""captions":{"playerCaptionsTracklistRenderer":{"translationLanguages":[]}},"#),
    )
    .await;

    let result = lookup_against(&server, &[]).lookup("abc").await;

    assert_eq!(
        result,
        LookupResult::Failure {
            kind: ErrorKind::NoTranscriptAvailable,
            detail: "No transcript available for this video.".to_string(),
        }
    );
}
