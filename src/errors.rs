/*!
 * Error types for the subdeck application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while reading and parsing subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A timecode had more than three colon-separated parts or a non-numeric part
    #[error("Malformed timecode: {0:?}")]
    MalformedTimecode(String),

    /// An ASS file lacks its Format line or one of the start/end/text columns
    #[error("Missing required field in subtitle header: {0}")]
    MissingRequiredField(String),

    /// The file suffix does not name a supported subtitle format
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),

    /// The subtitle file could not be opened or read
    #[error("Failed to read subtitle file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when running the external media tool
#[derive(Error, Debug)]
pub enum MediaError {
    /// The ffmpeg binary could not be started
    #[error("Media tool not found or not executable: {0}")]
    ToolNotFound(String),

    /// ffmpeg ran but exited with a failure status
    #[error("Media tool failed: {0}")]
    ProcessFailed(String),

    /// ffmpeg did not finish within the configured timeout
    #[error("Media tool timed out after {0} seconds")]
    Timeout(u64),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from media extraction
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
