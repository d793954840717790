use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Target language tags (e.g. "fr", "zh-TW")
    #[serde(default = "default_target_languages")]
    pub target_languages: Vec<String>,

    /// Maximum characters per line requested from the translator
    #[serde(default = "default_line_width")]
    pub line_width: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Where translated files are written
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output file placement
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct OutputConfig {
    /// Output directory; next to the source file when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Replace existing output files
    #[serde(default)]
    pub overwrite: bool,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

pub const MIN_LINE_WIDTH: usize = 20;
pub const MAX_LINE_WIDTH: usize = 80;

fn default_target_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_line_width() -> usize {
    42
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path.as_ref(), config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path.as_ref()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.target_languages.is_empty() {
            return Err(anyhow!("At least one target language is required"));
        }

        for tag in &self.target_languages {
            crate::language_utils::validate_language_tag(tag)?;
        }

        if !(MIN_LINE_WIDTH..=MAX_LINE_WIDTH).contains(&self.line_width) {
            return Err(anyhow!(
                "Line width must be between {} and {}, got {}",
                MIN_LINE_WIDTH,
                MAX_LINE_WIDTH,
                self.line_width
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_languages: default_target_languages(),
            line_width: default_line_width(),
            log_level: LogLevel::default(),
            output: OutputConfig::default(),
        }
    }
}
