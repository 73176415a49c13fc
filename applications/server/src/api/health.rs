/// Health check
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Whether the audio root exists as a directory
    pub audio_root_ready: bool,
    /// Registered players in priority order
    pub players: Vec<&'static str>,
}

/// GET /health
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let audio_root_ready = tokio::fs::metadata(app_state.playback.audio_root())
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        audio_root_ready,
        players: app_state.playback.registry().player_names(),
    })
}
