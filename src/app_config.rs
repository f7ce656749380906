use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::errors::AppError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Milliseconds added before and after every cue
    #[serde(default = "default_padding_ms")]
    pub padding_ms: u64,

    /// Largest start-time distance accepted when pairing a translation cue
    #[serde(default = "default_max_diff_ms")]
    pub max_diff_ms: u64,

    /// Media extraction config
    #[serde(default)]
    pub media: MediaConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the external media tool
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MediaConfig {
    // @field: ffmpeg executable name or path
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    // @field: Output sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    // @field: Output channel count
    #[serde(default = "default_channels")]
    pub channels: u32,

    // @field: Variable bitrate quality passed as -aq
    #[serde(default = "default_audio_quality")]
    pub audio_quality: u32,

    // @field: Apply EBU R128 loudness normalization
    #[serde(default = "default_true")]
    pub normalize_audio: bool,

    // @field: Grab a still frame for each segment
    #[serde(default)]
    pub extract_frames: bool,

    // @field: Timeout seconds per ffmpeg run
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            audio_quality: default_audio_quality(),
            normalize_audio: true,
            extract_frames: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` crate
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_padding_ms() -> u64 {
    300
}

fn default_max_diff_ms() -> u64 {
    1000
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_channels() -> u32 {
    1
}

fn default_audio_quality() -> u32 {
    8
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.media.ffmpeg_path.trim().is_empty() {
            return Err(AppError::Config("ffmpeg_path must not be empty".to_string()));
        }

        if self.media.sample_rate == 0 {
            return Err(AppError::Config("sample_rate must be greater than zero".to_string()));
        }

        if self.media.channels == 0 {
            return Err(AppError::Config("channels must be greater than zero".to_string()));
        }

        if self.media.timeout_secs == 0 {
            return Err(AppError::Config("timeout_secs must be greater than zero".to_string()));
        }

        if self.max_diff_ms == 0 {
            return Err(AppError::Config("max_diff_ms must be greater than zero".to_string()));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            padding_ms: default_padding_ms(),
            max_diff_ms: default_max_diff_ms(),
            media: MediaConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
