//! User routes: registration, login, logout and the protected listing

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header::SET_COOKIE},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{debug, info};
use usergate_auth::{AuthError, AuthUser, require_session};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{CredentialsRequest, LoginResponse, MeResponse, UserResponse};

// ==================== Input Validation ====================

/// Maximum allowed username length
const MAX_USERNAME_LENGTH: usize = 64;
/// Maximum allowed password length (bounds the cost of a single hash)
const MAX_PASSWORD_LENGTH: usize = 256;

/// Validate username format and length
fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::BadRequest("Username cannot be empty".to_string()));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Username exceeds maximum length of {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    // Only allow alphanumeric characters, underscores, and hyphens
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ApiError::BadRequest(
            "Username can only contain alphanumeric characters, underscores, and hyphens"
                .to_string(),
        ));
    }
    Ok(())
}

/// Validate password length
fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::BadRequest("Password cannot be empty".to_string()));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

// ==================== Public Routes ====================

/// POST /users/register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_username(&request.username)?;
    validate_password(&request.password)?;

    debug!("Registering user: {}", request.username);

    let user = state
        .auth
        .register(&request.username, &request.password)
        .await?;

    metrics::counter!("usergate_registrations_total").increment(1);

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /users/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Oversized input fails like any other bad login, without a store lookup
    if request.username.len() > MAX_USERNAME_LENGTH || request.password.len() > MAX_PASSWORD_LENGTH
    {
        metrics::counter!("usergate_logins_total", "outcome" => "failure").increment(1);
        return Err(AuthError::InvalidCredentials.into());
    }

    let outcome = match state.auth.login(&request.username, &request.password).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if matches!(e, AuthError::InvalidCredentials) {
                metrics::counter!("usergate_logins_total", "outcome" => "failure").increment(1);
            }
            return Err(e.into());
        }
    };

    metrics::counter!("usergate_logins_total", "outcome" => "success").increment(1);

    let cookie = state.cookies.session_cookie(&outcome.token);

    Ok((
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            id: outcome.claims.id,
            username: outcome.claims.username,
            expires_in: state.auth.tokens().ttl_seconds(),
        }),
    ))
}

/// POST /users/logout
async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, state.cookies.clear_cookie())],
    )
}

// ==================== Protected Routes ====================

/// GET /users/getusers
async fn list_users(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    debug!("User {} listing users", user.username);

    let users = state.auth.list_users().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/me
async fn me(user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: user.id,
        username: user.username,
    })
}

/// Create user routes
///
/// The listing routes sit behind the session gate; register, login and
/// logout are public.
pub fn routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/users/getusers", get(list_users))
        .route("/users/me", get(me))
        .route_layer(middleware::from_fn_with_state(state.tokens(), require_session));

    info!("Mounted session-gated routes under /users");

    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/logout", post(logout))
        .merge(protected)
}
