//! Request/Response DTOs

use serde::{Deserialize, Serialize};
use usergate_db::User;

/// Register and login request body
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Login response
///
/// The token itself only travels in the `HttpOnly` cookie.
#[derive(Serialize)]
pub struct LoginResponse {
    pub id: i64,
    pub username: String,
    pub expires_in: i64,
}

/// User response (without password)
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Identity of the caller
#[derive(Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub username: String,
}
