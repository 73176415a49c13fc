/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use speakerbox_storage::users::{self, NewUser, User};

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Emails are compared case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// POST /auth/register
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<User>> {
    let email = normalize_email(&req.email);
    if email.is_empty() || !email.contains('@') {
        return Err(ServerError::BadRequest("A valid email is required".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ServerError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let full_name = req
        .full_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    let pool = app_state.db.pool();
    let password_hash = app_state.auth_service.hash_password(&req.password)?;

    let user = users::create_with_password(pool, NewUser { email, full_name }, &password_hash).await?;

    tracing::info!("Registered user {} ({})", user.id, user.email);

    Ok(Json(user))
}

/// POST /auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let pool = app_state.db.pool();
    let invalid = || ServerError::Auth("Invalid email or password".to_string());

    let user = users::find_by_email(pool, &normalize_email(&req.email))
        .await?
        .ok_or_else(invalid)?;

    let password_hash = users::get_password_hash(pool, user.id)
        .await?
        .ok_or_else(invalid)?;

    if !app_state
        .auth_service
        .verify_password(&req.password, &password_hash)?
    {
        return Err(invalid());
    }

    let tokens = app_state.auth_service.issue_pair(user.id)?;
    tracing::debug!("User {} logged in", user.id);

    Ok(Json(LoginResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        user,
    }))
}

/// POST /auth/refresh
pub async fn refresh(
    State(app_state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let user_id = app_state
        .auth_service
        .verify_refresh_token(&req.refresh_token)?;

    let access_token = app_state.auth_service.create_access_token(user_id)?;

    Ok(Json(RefreshResponse {
        access_token,
        token_type: "Bearer".to_string(),
    }))
}

/// GET /auth/me
pub async fn me(State(app_state): State<AppState>, auth: AuthenticatedUser) -> Result<Json<User>> {
    let user = users::get_by_id(app_state.db.pool(), auth.user_id())
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}
