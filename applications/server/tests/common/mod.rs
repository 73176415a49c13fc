//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use speakerbox_playback::{Launcher, PlaybackInvoker, PlayerCommand, PlayerRegistry};
use speakerbox_server::{
    create_router,
    services::{AuthService, FileStorage},
    state::AppState,
};
use speakerbox_storage::Database;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_PASSWORD: &str = "TestPassword123!";
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024;
const BOUNDARY: &str = "speakerbox-test-boundary";

/// Records player commands instead of starting processes
#[derive(Default)]
pub struct RecordingLauncher {
    commands: Mutex<Vec<PlayerCommand>>,
}

impl RecordingLauncher {
    pub fn commands(&self) -> Vec<PlayerCommand> {
        self.commands.lock().unwrap().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, command: &PlayerCommand) -> std::io::Result<()> {
        self.commands.lock().unwrap().push(command.clone());
        Ok(())
    }
}

/// Fails every launch the way a missing executable does
pub struct FailingLauncher;

impl Launcher for FailingLauncher {
    fn launch(&self, _command: &PlayerCommand) -> std::io::Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "No such file or directory",
        ))
    }
}

/// Router backed by a temporary database and audio directory
pub struct TestApp {
    pub router: Router,
    pub db: Arc<Database>,
    pub auth_service: Arc<AuthService>,
    pub launcher: Arc<RecordingLauncher>,
    pub audio_dir: TempDir,
    _db_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(PlayerRegistry::standard(), None).await
    }

    pub async fn with_registry(registry: PlayerRegistry) -> Self {
        Self::build(registry, None).await
    }

    pub async fn with_launcher(launcher: Arc<dyn Launcher>) -> Self {
        Self::build(PlayerRegistry::standard(), Some(launcher)).await
    }

    async fn build(registry: PlayerRegistry, launcher: Option<Arc<dyn Launcher>>) -> Self {
        let db_dir = TempDir::new().unwrap();
        let db_url = format!("sqlite://{}", db_dir.path().join("test.db").display());
        let db = Arc::new(Database::new(&db_url).await.unwrap());

        let audio_dir = TempDir::new().unwrap();
        let file_storage = FileStorage::new(audio_dir.path().to_path_buf(), MAX_UPLOAD_BYTES);
        file_storage.initialize().await.unwrap();

        let auth_service = Arc::new(AuthService::new("test-secret-key", 1, 1));

        let recorder = Arc::new(RecordingLauncher::default());
        let launcher = launcher.unwrap_or_else(|| recorder.clone() as Arc<dyn Launcher>);
        let playback = PlaybackInvoker::new(audio_dir.path())
            .with_registry(registry)
            .with_launcher(launcher);

        let app_state = AppState::new(
            Arc::clone(&db),
            Arc::clone(&auth_service),
            Arc::new(file_storage),
            Arc::new(playback),
        );

        Self {
            router: create_router(app_state, None),
            db,
            auth_service,
            launcher: recorder,
            audio_dir,
            _db_dir: db_dir,
        }
    }

    pub fn audio_path(&self) -> &Path {
        self.audio_dir.path()
    }

    /// Put a file straight into the audio root
    pub fn write_audio(&self, relative: &str, data: &[u8]) {
        let path = self.audio_path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, data).unwrap();
    }

    /// Send a request and return the status with the JSON body (Null if empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("GET", uri, token, None)).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("POST", uri, token, Some(body))).await
    }

    pub async fn put_json(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(request("PUT", uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(request("DELETE", uri, token, None)).await
    }

    /// Register a user through the API and return its ID and an access token
    pub async fn register_and_login(&self, email: &str) -> (i64, String) {
        let (status, user) = self
            .post_json(
                "/auth/register",
                None,
                serde_json::json!({
                    "email": email,
                    "password": TEST_PASSWORD,
                    "fullName": "Test User",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", user);

        let (status, login) = self
            .post_json(
                "/auth/login",
                None,
                serde_json::json!({ "email": email, "password": TEST_PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", login);

        (
            user["id"].as_i64().unwrap(),
            login["access_token"].as_str().unwrap().to_string(),
        )
    }

    /// Upload a file through POST /audio
    pub async fn upload(
        &self,
        token: &str,
        name: Option<&str>,
        file_name: &str,
        data: &[u8],
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri("/audio")
            .method("POST")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(name, file_name, data)))
            .unwrap();
        self.send(request).await
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn multipart_body(name: Option<&str>, file_name: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(name) = name {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{}\r\n",
                BOUNDARY, name
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            BOUNDARY, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}
