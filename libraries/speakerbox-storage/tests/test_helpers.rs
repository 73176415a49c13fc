//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! so every pooled connection sees the same schema and data.

#![allow(dead_code)]

use speakerbox_storage::{audio, users, Database};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub db: Database,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let db = Database::new(&db_url)
            .await
            .expect("Failed to create database");

        Self {
            db,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }
}

/// Test fixture: Create a test user
pub async fn create_test_user(pool: &SqlitePool, email: &str) -> i64 {
    users::create(
        pool,
        users::NewUser {
            email: email.to_string(),
            full_name: Some(format!("User {}", email)),
        },
    )
    .await
    .expect("Failed to create test user")
    .id
}

/// Test fixture: Create an audio record owned by `user_id`
pub async fn create_test_audio(pool: &SqlitePool, user_id: i64, name: &str) -> i64 {
    audio::create(
        pool,
        audio::NewAudio {
            name: name.to_string(),
            path: format!("{}.mp3", name.to_lowercase().replace(' ', "_")),
            uploaded_by_id: user_id,
        },
    )
    .await
    .expect("Failed to create test audio")
    .id
}
