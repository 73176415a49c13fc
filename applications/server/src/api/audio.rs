/// Audio library API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use speakerbox_storage::audio::{self, Audio, AudioFilter, AudioListing, NewAudio};

#[derive(Debug, Deserialize)]
pub struct AudioQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub favorites: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub audio: Audio,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RenameResponse {
    pub message: String,
    pub audio: AudioListing,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /audio?search=&favorites=true
pub async fn list_audio(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<AudioQuery>,
) -> Result<Json<Vec<AudioListing>>> {
    let filter = AudioFilter {
        search: query.search,
        favorites_only: query.favorites.as_deref() == Some("true"),
    };

    let listings = audio::list(app_state.db.pool(), &filter, Some(auth.user_id())).await?;
    Ok(Json(listings))
}

/// GET /audio/:id
pub async fn get_audio(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
) -> Result<Json<AudioListing>> {
    let listing = audio::get_listing(app_state.db.pool(), id, None)
        .await?
        .ok_or_else(|| ServerError::NotFound("Audio not found".to_string()))?;
    Ok(Json(listing))
}

/// POST /audio
/// Upload an audio file (multipart `file`) with a display `name`
pub async fn upload_audio(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<UploadResponse>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::BadRequest("Missing Content-Type".to_string()))?;

    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| ServerError::BadRequest("Expected multipart/form-data".to_string()))?;

    // Convert Bytes to a stream for multer
    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to parse multipart: {}", e)))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| ServerError::BadRequest("Missing file name".to_string()))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Failed to read file: {}", e)))?;
                file = Some((file_name, data.to_vec()));
            }
            Some("name") => {
                name = Some(field.text().await.map_err(|e| {
                    ServerError::BadRequest(format!("Failed to read name: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| ServerError::BadRequest("Missing file".to_string()))?;

    let stored = app_state.file_storage.store_upload(&file_name, &data).await?;

    // Fall back to the file stem when no display name was given
    let name = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| {
            std::path::Path::new(&stored)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| stored.clone())
        });

    let created = audio::create(
        app_state.db.pool(),
        NewAudio {
            name,
            path: stored.clone(),
            uploaded_by_id: auth.user_id(),
        },
    )
    .await;

    let created = match created {
        Ok(created) => created,
        Err(e) => {
            // Don't leave an orphaned file behind
            if let Err(cleanup) = app_state.file_storage.delete(&stored).await {
                tracing::warn!("Failed to remove {} after error: {}", stored, cleanup);
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        "User {} uploaded audio {} ({})",
        auth.user_id(),
        created.id,
        created.path
    );

    Ok(Json(UploadResponse {
        message: "Audio uploaded successfully".to_string(),
        audio: created,
    }))
}

/// Load an audio record and check that `auth` uploaded it
async fn owned_audio(
    app_state: &AppState,
    id: i64,
    auth: AuthenticatedUser,
    denied: &str,
) -> Result<Audio> {
    let record = audio::get_by_id(app_state.db.pool(), id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Audio not found".to_string()))?;

    if record.uploaded_by_id != Some(auth.user_id()) {
        return Err(ServerError::Forbidden(denied.to_string()));
    }

    Ok(record)
}

/// PUT /audio/:id
pub async fn rename_audio(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<RenameRequest>,
) -> Result<Json<RenameResponse>> {
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Name is required".to_string()))?;

    owned_audio(
        &app_state,
        id,
        auth,
        "You are not authorized to rename this audio file",
    )
    .await?;

    let pool = app_state.db.pool();
    audio::rename(pool, id, name).await?;

    let listing = audio::get_listing(pool, id, Some(auth.user_id()))
        .await?
        .ok_or_else(|| ServerError::NotFound("Audio not found".to_string()))?;

    Ok(Json(RenameResponse {
        message: "Audio renamed successfully".to_string(),
        audio: listing,
    }))
}

/// DELETE /audio/:id
pub async fn delete_audio(
    Path(id): Path<i64>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<MessageResponse>> {
    let record = owned_audio(
        &app_state,
        id,
        auth,
        "You are not authorized to delete this audio",
    )
    .await?;

    audio::delete(app_state.db.pool(), id).await?;

    if let Err(e) = app_state.file_storage.delete(&record.path).await {
        tracing::warn!("Audio {} deleted but file {} remains: {}", id, record.path, e);
    }

    Ok(Json(MessageResponse {
        message: "Audio deleted successfully".to_string(),
    }))
}
