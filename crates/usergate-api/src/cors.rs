//! CORS policy for the browser frontend

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::error::ApiError;

/// Build a credentialed CORS layer for an explicit list of origins
///
/// Cookies only flow cross-origin with credentials enabled, which rules
/// out a wildcard origin. Returns `None` when no origins are configured.
pub fn cors_layer(allowed_origins: &[String]) -> Result<Option<CorsLayer>, ApiError> {
    if allowed_origins.is_empty() {
        return Ok(None);
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            if origin == "*" {
                return Err(ApiError::Config(
                    "wildcard origin cannot be combined with credentials".to_string(),
                ));
            }
            HeaderValue::from_str(origin)
                .map_err(|_| ApiError::Config(format!("invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION]),
    ))
}
