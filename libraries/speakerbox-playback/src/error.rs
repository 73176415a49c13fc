//! Error types for server-side playback

use std::path::PathBuf;
use thiserror::Error;

/// Playback errors
///
/// Every variant describes a failure observed before or during the launch of
/// the player process. Failures of the player after it started are only logged.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Requested file does not exist or cannot be opened
    #[error("Audio file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Requested path escapes the audio root
    #[error("Invalid audio file path: {0}")]
    InvalidPath(String),

    /// Extension is not in the allow-list
    #[error("Unsupported audio format: {extension:?}")]
    UnsupportedFormat { extension: Option<String> },

    /// No registered player handles the extension
    #[error("No suitable audio player found for {extension}")]
    NoPlayerAvailable { extension: String },

    /// The player process could not be started
    #[error("Failed to launch {player}: {source}")]
    Spawn {
        player: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl PlaybackError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
