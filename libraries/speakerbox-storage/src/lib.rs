//! Speakerbox Storage
//!
//! `SQLite` metadata store for Speakerbox: users and their credentials, audio
//! records and per-user favorites.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each table owns its own queries and types
//!   (`users`, `audio`, `favorites`)
//! - **Plain functions**: every query takes a `&SqlitePool`, so handlers can
//!   use them without a storage trait in between
//!
//! # Example
//!
//! ```rust,no_run
//! use speakerbox_storage::{audio, Database};
//!
//! # async fn example() -> Result<(), speakerbox_storage::StorageError> {
//! let db = Database::new("sqlite://speakerbox.db").await?;
//! let sounds = audio::list(db.pool(), &audio::AudioFilter::default(), None).await?;
//! # Ok(())
//! # }
//! ```

mod error;

// Vertical slices
pub mod audio;
pub mod favorites;
pub mod users;

pub use error::{Result, StorageError};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://speakerbox.db>`)
///
/// The database file and its parent directory are created if missing.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    // Parse the URL into options so we can configure SQLite behavior
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal) // Use WAL mode for better concurrency
        .busy_timeout(std::time::Duration::from_secs(30)); // Wait up to 30s for locks

    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("Pool created");

    Ok(pool)
}

/// Connection pool with the schema applied
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to `database_url` and run migrations
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool; migrations are assumed to be applied
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Current time as unix seconds, the storage format for all timestamps
pub(crate) fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Convert a stored timestamp back into a `DateTime`
pub(crate) fn from_timestamp(secs: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::from_timestamp(secs, 0).unwrap_or_default()
}
