/// Favorite API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use speakerbox_storage::{audio, favorites, StorageError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub message: String,
    pub is_favorited: bool,
}

/// POST /audio/:id/favorite
pub async fn add_favorite(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<FavoriteResponse>> {
    match favorites::add(app_state.db.pool(), auth.user_id(), id).await {
        Ok(_) => {}
        Err(StorageError::AlreadyExists { .. }) => {
            return Err(ServerError::BadRequest(
                "Audio is already in favorites".to_string(),
            ));
        }
        Err(StorageError::NotFound { ref entity, .. }) if entity == "Audio" => {
            return Err(ServerError::NotFound("Audio not found".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::debug!("User {} favorited audio {}", auth.user_id(), id);

    Ok(Json(FavoriteResponse {
        message: "Audio added to favorites".to_string(),
        is_favorited: true,
    }))
}

/// DELETE /audio/:id/favorite
pub async fn remove_favorite(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<FavoriteResponse>> {
    let pool = app_state.db.pool();

    if audio::get_by_id(pool, id).await?.is_none() {
        return Err(ServerError::NotFound("Audio not found".to_string()));
    }

    if !favorites::remove(pool, auth.user_id(), id).await? {
        return Err(ServerError::BadRequest(
            "Audio is not in favorites".to_string(),
        ));
    }

    tracing::debug!("User {} unfavorited audio {}", auth.user_id(), id);

    Ok(Json(FavoriteResponse {
        message: "Audio removed from favorites".to_string(),
        is_favorited: false,
    }))
}
