/// Server-side playback API routes
use crate::{error::Result, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PlayResponse {
    pub message: String,
    pub file: String,
    pub volume: u8,
}

/// GET /audio/play/*path - Play a file from the audio root through the
/// server's speakers
///
/// Responds as soon as the player process is running.
pub async fn play(
    State(app_state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<PlayResponse>> {
    let outcome = app_state.playback.play(&path).await?;

    tracing::info!(
        player = outcome.player,
        file = %outcome.file,
        "Playback started"
    );

    Ok(Json(PlayResponse {
        message: "Audio playback completed successfully".to_string(),
        file: outcome.file,
        volume: outcome.volume,
    }))
}
