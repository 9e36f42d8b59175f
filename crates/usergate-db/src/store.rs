//! User store contract

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::{NewUser, User};

/// User store trait
///
/// The authentication core reaches user records only through this
/// contract. Implementations own uniqueness of usernames and report a
/// violation as `DbError::Duplicate`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by username, `None` when no such user exists
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DbError>;

    /// Persist a new user and return the stored record
    async fn insert_user(&self, user: NewUser) -> Result<User, DbError>;

    /// List all users ordered by username
    async fn list_users(&self) -> Result<Vec<User>, DbError>;
}
