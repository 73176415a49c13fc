//! User management and authentication queries

use crate::error::{is_unique_violation, Result, StorageError};
use crate::{from_timestamp, now_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

/// Public user record
///
/// Never carries the password hash; credentials live in their own table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub full_name: Option<String>,
}

fn from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        created_at: from_timestamp(row.get("created_at")),
    }
}

/// Create a user
///
/// Fails with [`StorageError::AlreadyExists`] when the email is taken.
pub async fn create(pool: &SqlitePool, user: NewUser) -> Result<User> {
    let mut conn = pool.acquire().await?;
    insert_user(&mut conn, user).await
}

/// Create a user together with its password hash
///
/// Both rows are written in one transaction, so a user never exists
/// without credentials.
pub async fn create_with_password(
    pool: &SqlitePool,
    user: NewUser,
    password_hash: &str,
) -> Result<User> {
    let mut tx = pool.begin().await?;

    let user = insert_user(&mut tx, user).await?;
    upsert_password_hash(&mut tx, user.id, password_hash).await?;

    tx.commit().await?;
    Ok(user)
}

async fn insert_user(conn: &mut SqliteConnection, user: NewUser) -> Result<User> {
    let created_at = now_timestamp();

    let result = sqlx::query("INSERT INTO users (email, full_name, created_at) VALUES (?, ?, ?)")
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(created_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StorageError::already_exists("User", &user.email)
            } else {
                e.into()
            }
        })?;

    Ok(User {
        id: result.last_insert_rowid(),
        email: user.email,
        full_name: user.full_name,
        created_at: from_timestamp(created_at),
    })
}

/// Get a user by ID
pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, email, full_name, created_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(from_row))
}

/// Find a user by email (exact match)
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, email, full_name, created_at FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(from_row))
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query("SELECT id, email, full_name, created_at FROM users ORDER BY email")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(from_row).collect())
}

/// Get user's password hash for authentication
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `user_id` - User ID to look up
///
/// # Returns
///
/// Returns the password hash if found, or None if user has no credentials
pub async fn get_password_hash(pool: &SqlitePool, user_id: i64) -> Result<Option<String>> {
    let row = sqlx::query("SELECT password_hash FROM user_credentials WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.get("password_hash")))
}

/// Create or update user credentials
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `user_id` - User ID
/// * `password_hash` - Hashed password (should already be hashed with bcrypt)
pub async fn set_password_hash(pool: &SqlitePool, user_id: i64, password_hash: &str) -> Result<()> {
    let mut conn = pool.acquire().await?;
    upsert_password_hash(&mut conn, user_id, password_hash).await
}

async fn upsert_password_hash(
    conn: &mut SqliteConnection,
    user_id: i64,
    password_hash: &str,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO user_credentials (user_id, password_hash, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(user_id)
         DO UPDATE SET password_hash = excluded.password_hash, updated_at = excluded.updated_at",
    )
    .bind(user_id)
    .bind(password_hash)
    .bind(now_timestamp())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Check if user has credentials set
pub async fn has_credentials(pool: &SqlitePool, user_id: i64) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_credentials WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(count > 0)
}
