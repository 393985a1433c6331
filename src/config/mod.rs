use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::utils::validate_and_normalize_url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// YouTube endpoints and transcript preferences
    pub youtube: YoutubeConfig,

    /// Report settings
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeConfig {
    /// Canonical watch page, probed with `?v=<id>`
    pub watch_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Accept-Language header for the watch page
    pub accept_language: String,

    /// Preferred transcript languages, in priority order
    #[serde(default)]
    pub languages: Vec<String>,

    /// Language reported when the provider gives no language code
    pub assumed_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Number of transcript characters shown in the preview
    pub preview_chars: usize,

    /// Default output format
    pub default_output_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube: YoutubeConfig {
                watch_url: "https://www.youtube.com/watch".to_string(),
                user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
                accept_language: "en-US".to_string(),
                languages: Vec::new(),
                assumed_language: "en".to_string(),
            },
            display: DisplayConfig {
                preview_chars: 500,
                default_output_format: "text".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults when none exists
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = Self::config_path(explicit)?;

        if !config_path.exists() {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = fs_err::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config = Self::from_yaml(&content)?;
        tracing::debug!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        let config_path = Self::config_path(explicit)?;

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs_err::create_dir_all(parent)?;
            }
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get configuration file path
    pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }

        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("yt-transcript-debugger").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        validate_and_normalize_url(&self.youtube.watch_url)
            .context("Invalid youtube.watch_url")?;

        if self.youtube.assumed_language.trim().is_empty() {
            anyhow::bail!("youtube.assumed_language must not be empty");
        }

        if self.display.preview_chars == 0 {
            anyhow::bail!("display.preview_chars must be greater than zero");
        }

        self.output_format()?;

        Ok(())
    }

    /// Default output format as a CLI value
    pub fn output_format(&self) -> Result<OutputFormat> {
        OutputFormat::from_str(&self.display.default_output_format, true).map_err(|_| {
            anyhow::anyhow!(
                "Unknown display.default_output_format: {}",
                self.display.default_output_format
            )
        })
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Watch URL: {}", self.youtube.watch_url);
        println!("  Accept-Language: {}", self.youtube.accept_language);
        if self.youtube.languages.is_empty() {
            println!("  Languages: provider default");
        } else {
            println!("  Languages: {}", self.youtube.languages.join(", "));
        }
        println!("  Assumed Language: {}", self.youtube.assumed_language);
        println!("  Preview Characters: {}", self.display.preview_chars);
        println!("  Default Format: {}", self.display.default_output_format);
    }
}
