//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

use crate::error::DbError;
use crate::utils::parse_datetime;

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = DbError;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let malformed = |e: sqlx::Error| DbError::MalformedRow(e.to_string());

        let username: String = row.try_get("username").map_err(malformed)?;
        let password_hash: String = row.try_get("password_hash").map_err(malformed)?;
        if username.is_empty() || password_hash.is_empty() {
            return Err(DbError::MalformedRow(
                "user row has an empty username or password hash".to_string(),
            ));
        }

        let created_at: String = row.try_get("created_at").map_err(malformed)?;

        Ok(User {
            id: row.try_get("id").map_err(malformed)?,
            username,
            password_hash,
            created_at: parse_datetime("created_at", &created_at)?,
        })
    }
}
