//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use usergate_auth::AuthError;
use usergate_db::DbError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            ApiError::Auth(e) => {
                let (status, message) = e.status_and_message();
                (status, message.to_string())
            }
            ApiError::Database(DbError::Duplicate(_)) => {
                (StatusCode::CONFLICT, "Username already taken".to_string())
            }
            ApiError::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

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
    fn test_store_fault_is_generic() {
        let response =
            ApiError::Database(DbError::MalformedRow("id: bad type".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_auth_errors_keep_their_status() {
        let response = ApiError::from(AuthError::MissingToken).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ApiError::from(AuthError::InvalidCredentials).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_duplicate_is_conflict() {
        let response = ApiError::Database(DbError::Duplicate("alice".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
