//! Authentication middleware for Axum

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cookie::token_from_headers;
use crate::error::AuthError;
use crate::jwt::{IdentityClaims, SessionTokenManager};

/// Authenticated user information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

impl From<IdentityClaims> for AuthUser {
    fn from(claims: IdentityClaims) -> Self {
        Self {
            id: claims.id,
            username: claims.username,
        }
    }
}

/// Run the per-request gate over a set of headers
///
/// No token yields `MissingToken`; a token that fails verification yields
/// `InvalidToken` (or `TokenExpired`).
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &SessionTokenManager,
) -> Result<AuthUser, AuthError> {
    let token = token_from_headers(headers).ok_or(AuthError::MissingToken)?;
    let claims = tokens.validate(token)?;
    Ok(AuthUser::from(claims))
}

/// Session middleware
///
/// Rejects the request before it reaches the handler unless it carries a
/// valid session token. On success the `AuthUser` is added to request
/// extensions.
pub async fn require_session(
    State(tokens): State<Arc<SessionTokenManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = match authenticate(request.headers(), &tokens) {
        Ok(user) => user,
        Err(e) => {
            warn!(
                reason = e.kind(),
                path = %request.uri().path(),
                "Rejected unauthenticated request"
            );
            metrics::counter!("usergate_auth_rejections_total", "reason" => e.kind())
                .increment(1);
            return Err(e);
        }
    };

    debug!("Authenticated user: {} ({})", user.username, user.id);

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only present behind `require_session`
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}
