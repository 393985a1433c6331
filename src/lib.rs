//! YouTube Transcript Debugger - A Rust CLI tool for diagnosing transcript retrieval
//!
//! This library checks whether a YouTube video is reachable, fetches one of its caption
//! tracks, and classifies the outcome into a small, closed set of results that a display
//! layer (the bundled CLI, or a test harness) can render.

pub mod cli;
pub mod config;
pub mod lookup;
pub mod output;
pub mod transcript;
pub mod utils;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use lookup::{ErrorKind, LookupResult, TranscriptLookup};
pub use transcript::{CaptionTrack, FetchedTranscript, ProviderError, TranscriptEntry, TranscriptProvider};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;
