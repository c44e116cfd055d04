//! Subtitle error types.

use std::path::PathBuf;

/// Errors that can occur during subtitle operations.
#[derive(Debug, thiserror::Error)]
pub enum SubtitleError {
    /// Failed to read subtitle file.
    #[error("Failed to read file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write subtitle file.
    #[error("Failed to write file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Parse error.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
}

impl SubtitleError {
    pub fn read(path: PathBuf, source: std::io::Error) -> Self {
        Self::ReadError { path, source }
    }

    pub fn write(path: PathBuf, source: std::io::Error) -> Self {
        Self::WriteError { path, source }
    }
}

/// Errors that can occur during subtitle parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Invalid or malformed time format.
    #[error("Invalid time format at line {line}: '{value}'")]
    InvalidTime { line: usize, value: String },
}

impl ParseError {
    pub fn invalid_time(line: usize, value: impl Into<String>) -> Self {
        Self::InvalidTime {
            line,
            value: value.into(),
        }
    }
}

/// Result alias for subtitle operations.
pub type SubtitleResult<T> = Result<T, SubtitleError>;
