use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "yt-transcript-debugger",
    about = "YouTube Transcript Debugger - Check whether a video's transcript can be fetched",
    version,
    long_about = "A small diagnostic CLI that probes a YouTube watch page, tries to download one of the video's caption tracks, and reports exactly why a transcript could or could not be retrieved."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file to use instead of the default locations
    #[arg(long, global = true, value_name = "FILE", env = "YT_TRANSCRIPT_DEBUGGER_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up the transcript of a single video
    Lookup {
        /// Video ID or YouTube URL (watch, youtu.be, embed, shorts)
        #[arg(value_name = "VIDEO")]
        video: String,

        /// Preferred transcript languages, in priority order (provider default if not specified)
        #[arg(short, long, value_name = "LANGS", value_delimiter = ',')]
        languages: Vec<String>,

        /// Output format (falls back to the configured default)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Number of transcript characters to preview
        #[arg(long, value_name = "COUNT")]
        preview_chars: Option<usize>,
    },

    /// List the caption tracks a video advertises
    Tracks {
        /// Video ID or YouTube URL
        #[arg(value_name = "VIDEO")]
        video: String,
    },

    /// Prompt for video IDs and look each one up until EOF
    Interactive {
        /// Preferred transcript languages, in priority order
        #[arg(short, long, value_name = "LANGS", value_delimiter = ',')]
        languages: Vec<String>,
    },

    /// Show or initialise the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human readable report
    Text,
    /// JSON report with the debug record
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_parses_language_list() {
        let cli = Cli::try_parse_from([
            "yt-transcript-debugger",
            "lookup",
            "dQw4w9WgXcQ",
            "--languages",
            "de,en",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Lookup { video, languages, format, preview_chars } => {
                assert_eq!(video, "dQw4w9WgXcQ");
                assert_eq!(languages, vec!["de", "en"]);
                assert_eq!(format, Some(OutputFormat::Json));
                assert_eq!(preview_chars, None);
            }
            _ => panic!("expected lookup command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["yt-transcript-debugger", "tracks", "abc", "-v", "-q"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.quiet);
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
