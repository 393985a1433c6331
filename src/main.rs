use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_transcript_debugger::cli::{Cli, Commands};
use yt_transcript_debugger::config::Config;
use yt_transcript_debugger::lookup::{LookupResult, TranscriptLookup};
use yt_transcript_debugger::{output, utils};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing, on stderr so reports on stdout stay parseable
    let default_filter = if cli.verbose {
        "yt_transcript_debugger=debug"
    } else {
        "yt_transcript_debugger=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Lookup {
            video,
            languages,
            format,
            preview_chars,
        } => {
            if !languages.is_empty() {
                config.youtube.languages = languages;
            }
            let format = match format {
                Some(format) => format,
                None => config.output_format()?,
            };
            let preview_chars = preview_chars.unwrap_or(config.display.preview_chars);

            let lookup = TranscriptLookup::new(&config)?;
            let video_id = utils::extract_video_id(&video);

            let result = run_lookup(&lookup, &video_id, cli.quiet).await;
            output::print_to_console(&video_id, &result, &format, preview_chars)?;

            if !result.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Tracks { video } => {
            let lookup = TranscriptLookup::new(&config)?;
            let video_id = utils::extract_video_id(&video);
            let provider = lookup.provider();

            tracing::info!("Listing caption tracks for video ID: {}", video_id);
            let tracks = provider.list_tracks(&video_id).await?;
            println!("{}", output::format_tracks(&video_id, provider.provider_name(), &tracks));
        }
        Commands::Interactive { languages } => {
            if !languages.is_empty() {
                config.youtube.languages = languages;
            }
            let format = config.output_format()?;
            let lookup = TranscriptLookup::new(&config)?;

            let stdin = std::io::stdin();
            loop {
                print!("Enter YouTube Video ID: ");
                std::io::stdout().flush()?;

                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }

                let input = line.trim();
                if matches!(input, "quit" | "exit") {
                    break;
                }

                let video_id = utils::extract_video_id(input);
                let result = run_lookup(&lookup, &video_id, cli.quiet).await;
                output::print_to_console(&video_id, &result, &format, config.display.preview_chars)?;
                println!();
            }
        }
        Commands::Config { show, init } => {
            if init {
                let path = Config::default().save(cli.config.as_deref()).await?;
                println!("Default configuration written to: {}", path.display());
            }
            if show || !init {
                config.display();
            }
        }
    }

    Ok(())
}

/// Run one lookup behind a spinner
async fn run_lookup(lookup: &TranscriptLookup, video_id: &str, quiet: bool) -> LookupResult {
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.set_message(format!("Fetching transcript for {}...", video_id));
    progress.enable_steady_tick(Duration::from_millis(100));

    let result = lookup.lookup(video_id).await;

    progress.finish_and_clear();
    result
}
