// ABOUTME: Error types for the deckgen application
// ABOUTME: Covers the collaborators around the pipeline; the core stages never fail

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to fetch remote resource: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Invalid resource path: {0}")]
    InvalidResourcePath(String),

    #[error("Theme '{name}' is invalid: {message}")]
    ThemeConfigError { name: String, message: String },

    #[error("Theme not found: {0}")]
    ThemeNotFound(String),

    #[error("Image generation error: {0}")]
    ImageError(String),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

// Implement conversion from anyhow::Error to our DeckError
impl From<anyhow::Error> for DeckError {
    fn from(err: anyhow::Error) -> Self {
        DeckError::UnknownError(err.to_string())
    }
}

impl From<serde_yaml::Error> for DeckError {
    fn from(err: serde_yaml::Error) -> Self {
        DeckError::ThemeConfigError {
            name: "<unknown>".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DeckError {
    fn from(err: serde_json::Error) -> Self {
        DeckError::UnknownError(format!("JSON serialization failed: {}", err))
    }
}

impl From<glob::PatternError> for DeckError {
    fn from(err: glob::PatternError) -> Self {
        DeckError::InvalidResourcePath(format!("Invalid glob pattern: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
