/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use speakerbox_playback::{format, PlaybackError, STANDARD_PLAYERS};
use speakerbox_storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

/// Status, client message and optional details for a playback failure
fn playback_response(err: &PlaybackError) -> (StatusCode, String, Option<String>) {
    match err {
        PlaybackError::NotFound { path } => {
            tracing::debug!("Audio file not found: {}", path.display());
            (StatusCode::NOT_FOUND, "Audio file not found".to_string(), None)
        }
        PlaybackError::InvalidPath(path) => {
            tracing::warn!("Rejected audio path outside the audio root: {}", path);
            (
                StatusCode::BAD_REQUEST,
                "Invalid audio file path".to_string(),
                None,
            )
        }
        PlaybackError::UnsupportedFormat { .. } => (
            StatusCode::BAD_REQUEST,
            format!(
                "Unsupported audio format. Supported formats: {}",
                format::supported_list()
            ),
            None,
        ),
        PlaybackError::NoPlayerAvailable { extension } => {
            tracing::warn!("No registered player handles {}", extension);
            let known: Vec<&str> = STANDARD_PLAYERS.iter().map(|p| p.name).collect();
            (
                StatusCode::BAD_REQUEST,
                format!(
                    "No suitable audio player found on the system. Please install one of: {}",
                    known.join(", ")
                ),
                None,
            )
        }
        PlaybackError::Spawn { player, source } => {
            tracing::error!("Failed to launch {}: {}", player, source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to play audio file".to_string(),
                Some(source.to_string()),
            )
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            ServerError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ServerError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ServerError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ServerError::Playback(ref e) => playback_response(e),
            ServerError::Storage(StorageError::NotFound { entity, .. }) => {
                (StatusCode::NOT_FOUND, format!("{} not found", entity), None)
            }
            ServerError::Storage(StorageError::AlreadyExists { entity, .. }) => (
                StatusCode::CONFLICT,
                format!("{} already exists", entity),
                None,
            ),
            ServerError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                    None,
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                    None,
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            ServerError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO error".to_string(),
                    None,
                )
            }
            ServerError::Jwt(ref e) => {
                tracing::warn!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string(), None)
            }
            ServerError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Password error".to_string(),
                    None,
                )
            }
        };

        let body = match details {
            Some(details) => json!({ "error": error_message, "details": details }),
            None => json!({ "error": error_message }),
        };

        (status, Json(body)).into_response()
    }
}
