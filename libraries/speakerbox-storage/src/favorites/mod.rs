//! Per-user favorites

use crate::error::{is_foreign_key_violation, is_unique_violation, Result, StorageError};
use crate::{from_timestamp, now_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    pub audio_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Mark `audio_id` as a favorite of `user_id`
///
/// Fails with [`StorageError::AlreadyExists`] if it already is one and with
/// [`StorageError::NotFound`] if the user or the audio record is missing.
pub async fn add(pool: &SqlitePool, user_id: i64, audio_id: i64) -> Result<Favorite> {
    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audio WHERE id = ?")
        .bind(audio_id)
        .fetch_one(pool)
        .await?;
    if exists == 0 {
        return Err(StorageError::not_found("Audio", audio_id));
    }

    let created_at = now_timestamp();

    let result =
        sqlx::query("INSERT INTO favorites (user_id, audio_id, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(audio_id)
            .bind(created_at)
            .execute(pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StorageError::already_exists("Favorite", format!("audio {}", audio_id))
                } else if is_foreign_key_violation(&e) {
                    StorageError::not_found("User", user_id)
                } else {
                    e.into()
                }
            })?;

    Ok(Favorite {
        id: result.last_insert_rowid(),
        user_id,
        audio_id,
        created_at: from_timestamp(created_at),
    })
}

/// Remove a favorite
///
/// Returns `false` when there was nothing to remove.
pub async fn remove(pool: &SqlitePool, user_id: i64, audio_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND audio_id = ?")
        .bind(user_id)
        .bind(audio_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn is_favorited(pool: &SqlitePool, user_id: i64, audio_id: i64) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE user_id = ? AND audio_id = ?")
            .bind(user_id)
            .bind(audio_id)
            .fetch_one(pool)
            .await?;

    Ok(count > 0)
}

/// All favorites of a user, newest first
pub async fn get_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Favorite>> {
    let rows = sqlx::query(
        "SELECT id, user_id, audio_id, created_at FROM favorites
         WHERE user_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| Favorite {
            id: row.get("id"),
            user_id: row.get("user_id"),
            audio_id: row.get("audio_id"),
            created_at: from_timestamp(row.get("created_at")),
        })
        .collect())
}
