//! Audio records
//!
//! An audio record points at a file (relative to the audio root) and keeps a
//! display name and the uploader. Listings add the uploader's public record
//! and whether the viewing user favorited the sound.

use crate::error::{Result, StorageError};
use crate::users::User;
use crate::{from_timestamp, now_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audio {
    pub id: i64,
    pub name: String,
    /// File name relative to the audio root
    pub path: String,
    pub uploaded_by_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for a new audio record
#[derive(Debug, Clone)]
pub struct NewAudio {
    pub name: String,
    pub path: String,
    pub uploaded_by_id: i64,
}

/// Audio record as shown to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioListing {
    #[serde(flatten)]
    pub audio: Audio,
    pub uploaded_by: Option<User>,
    pub is_favorited: bool,
}

/// Listing filters
#[derive(Debug, Clone, Default)]
pub struct AudioFilter {
    /// Substring of the name
    ///
    /// Matched with SQLite `LIKE`, which folds case for ASCII letters only:
    /// `"APPLAUSE"` finds `"applause"`, but `"ÉCHO"` does not find `"écho"`.
    pub search: Option<String>,
    /// Only sounds favorited by the viewer
    pub favorites_only: bool,
}

const LISTING_SELECT: &str = "
    SELECT a.id, a.name, a.path, a.uploaded_by_id, a.created_at, a.updated_at,
           u.id AS user_id, u.email AS user_email, u.full_name AS user_full_name,
           u.created_at AS user_created_at,
           EXISTS (
               SELECT 1 FROM favorites f WHERE f.audio_id = a.id AND f.user_id = ?
           ) AS is_favorited
    FROM audio a
    LEFT JOIN users u ON u.id = a.uploaded_by_id";

fn audio_from_row(row: &SqliteRow) -> Audio {
    Audio {
        id: row.get("id"),
        name: row.get("name"),
        path: row.get("path"),
        uploaded_by_id: row.get("uploaded_by_id"),
        created_at: from_timestamp(row.get("created_at")),
        updated_at: from_timestamp(row.get("updated_at")),
    }
}

fn listing_from_row(row: &SqliteRow) -> AudioListing {
    let uploaded_by = row.get::<Option<i64>, _>("user_id").map(|id| User {
        id,
        email: row.get("user_email"),
        full_name: row.get("user_full_name"),
        created_at: from_timestamp(row.get("user_created_at")),
    });

    AudioListing {
        audio: audio_from_row(row),
        uploaded_by,
        is_favorited: row.get::<i64, _>("is_favorited") != 0,
    }
}

/// Escape `LIKE` wildcards so user input matches literally
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Create an audio record
pub async fn create(pool: &SqlitePool, audio: NewAudio) -> Result<Audio> {
    let now = now_timestamp();

    let result = sqlx::query(
        "INSERT INTO audio (name, path, uploaded_by_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&audio.name)
    .bind(&audio.path)
    .bind(audio.uploaded_by_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Audio {
        id: result.last_insert_rowid(),
        name: audio.name,
        path: audio.path,
        uploaded_by_id: Some(audio.uploaded_by_id),
        created_at: from_timestamp(now),
        updated_at: from_timestamp(now),
    })
}

/// Get an audio record by ID
pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Audio>> {
    let row = sqlx::query(
        "SELECT id, name, path, uploaded_by_id, created_at, updated_at FROM audio WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(audio_from_row))
}

/// Get one listing, with favorite state for `viewer`
pub async fn get_listing(
    pool: &SqlitePool,
    id: i64,
    viewer: Option<i64>,
) -> Result<Option<AudioListing>> {
    let sql = format!("{} WHERE a.id = ?", LISTING_SELECT);
    let row = sqlx::query(&sql)
        .bind(viewer)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(listing_from_row))
}

/// List audio ordered by name
///
/// Without a viewer nothing is marked as favorite and `favorites_only`
/// yields an empty list.
pub async fn list(
    pool: &SqlitePool,
    filter: &AudioFilter,
    viewer: Option<i64>,
) -> Result<Vec<AudioListing>> {
    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern);

    let sql = format!(
        "{} WHERE (? IS NULL OR a.name LIKE ? ESCAPE '\\')
           AND (? = 0 OR EXISTS (
               SELECT 1 FROM favorites f WHERE f.audio_id = a.id AND f.user_id = ?
           ))
         ORDER BY a.name COLLATE NOCASE ASC, a.id ASC",
        LISTING_SELECT
    );

    let rows = sqlx::query(&sql)
        .bind(viewer)
        .bind(&search)
        .bind(&search)
        .bind(filter.favorites_only)
        .bind(viewer)
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(listing_from_row).collect())
}

/// Rename an audio record
pub async fn rename(pool: &SqlitePool, id: i64, name: &str) -> Result<Audio> {
    let result = sqlx::query("UPDATE audio SET name = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(now_timestamp())
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Audio", id));
    }

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Audio", id))
}

/// Delete an audio record; its favorites go with it
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM audio WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Audio", id));
    }

    Ok(())
}
