//! Error types for streamvista

use thiserror::Error;

/// Coarse error classes, used by callers deciding how to degrade a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Catalog retrieval
    RetrievalError,

    // Local durable storage
    PersistenceError,

    // Media playback
    PlaybackError,

    // User errors
    NotFound,
    InvalidConfig,
}

/// Main error type for streamvista
#[derive(Error, Debug)]
pub enum StreamVistaError {
    #[error("Catalog retrieval failed: {0}")]
    Retrieval(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to persist {0}")]
    Persistence(String),

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("Fullscreen request failed: {0}")]
    Fullscreen(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StreamVistaError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Retrieval(_) | Self::Http(_) => ErrorCode::RetrievalError,
            Self::Persistence(_) | Self::File(_) | Self::Json(_) => ErrorCode::PersistenceError,
            Self::Playback(_) | Self::Fullscreen(_) => ErrorCode::PlaybackError,
            Self::VideoNotFound(_) => ErrorCode::NotFound,
            Self::InvalidConfig(_) => ErrorCode::InvalidConfig,
        }
    }

    /// Nothing in this crate is fatal; the worst outcome is a stale or empty view.
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// Whether repeating the same call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self.code(), ErrorCode::RetrievalError | ErrorCode::PersistenceError)
    }
}

pub type Result<T> = std::result::Result<T, StreamVistaError>;
