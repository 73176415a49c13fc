/// HTTP routing
use crate::{api, middleware, state::AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::{path::PathBuf, sync::Arc};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Room for multipart boundaries and the `name` field on top of the file
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the application router
///
/// When `web_dir` is set, unmatched paths serve files from it and fall back to
/// its `index.html`.
pub fn create_router(app_state: AppState, web_dir: Option<PathBuf>) -> Router {
    let auth_service = Arc::clone(&app_state.auth_service);
    let upload_limit = app_state.file_storage.max_upload_bytes() + MULTIPART_OVERHEAD;

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/refresh", post(api::auth::refresh))
        .route("/audio/play/*path", get(api::playback::play))
        .route("/audio/:id", get(api::audio::get_audio));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(api::auth::me))
        .route(
            "/audio",
            get(api::audio::list_audio).post(api::audio::upload_audio),
        )
        .route(
            "/audio/:id",
            axum::routing::put(api::audio::rename_audio).delete(api::audio::delete_audio),
        )
        .route(
            "/audio/:id/favorite",
            post(api::favorites::add_favorite).delete(api::favorites::remove_favorite),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(axum_middleware::from_fn_with_state(
            auth_service,
            middleware::auth_middleware,
        ));

    let mut router = public_routes.merge(protected_routes);

    if let Some(web_dir) = web_dir {
        tracing::info!("Serving web UI from {}", web_dir.display());
        let index = web_dir.join("index.html");
        router = router.fallback_service(ServeDir::new(web_dir).not_found_service(ServeFile::new(index)));
    }

    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
