//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use usergate_db::DbError;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown username or wrong password; the two are never told apart
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing session token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Password hashing timed out")]
    HashTimeout,

    /// Token lifetime outside what a timestamp can represent
    #[error("Invalid token lifetime: {0} hours")]
    InvalidTokenTtl(i64),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("User store error: {0}")]
    Store(#[from] DbError),
}

impl AuthError {
    /// Short machine-readable label, used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::MalformedHash(_) => "malformed_hash",
            AuthError::PasswordHash(_) => "password_hash",
            AuthError::HashTimeout => "hash_timeout",
            AuthError::InvalidTokenTtl(_) => "invalid_token_ttl",
            AuthError::Jwt(_) => "jwt",
            AuthError::Store(_) => "store",
        }
    }

    /// Status code and client-facing message
    ///
    /// Internal detail never reaches the client; faults collapse into a
    /// generic message.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Login failed"),
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthError::InvalidToken | AuthError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, "Invalid token")
            }
            AuthError::Store(DbError::Duplicate(_)) => {
                (StatusCode::CONFLICT, "Username already taken")
            }
            AuthError::MalformedHash(_)
            | AuthError::PasswordHash(_)
            | AuthError::HashTimeout
            | AuthError::InvalidTokenTtl(_)
            | AuthError::Jwt(_)
            | AuthError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = axum::Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_failures_share_one_message() {
        let (status, message) = AuthError::InvalidCredentials.status_and_message();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Login failed");
    }

    #[test]
    fn test_faults_hide_detail() {
        let err = AuthError::MalformedHash("bad salt".to_string());
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("salt"));
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err = AuthError::from(DbError::Duplicate("alice".to_string()));
        assert_eq!(err.status_and_message().0, StatusCode::CONFLICT);
    }
}
