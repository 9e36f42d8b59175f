//! API routes

mod health;
pub mod metrics;
mod types;
mod users;

use axum::Router;
use std::sync::Arc;

use crate::state::{AppState, MetricsHandle};

pub use types::*;

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let mut router = Router::new()
        // Health check
        .merge(health::routes())
        // Registration, login and the protected listing
        .merge(users::routes(&state))
        .with_state(state);

    // Add metrics endpoint if handle is provided
    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::{Router, body::Body, http::Request, response::Response};
    use usergate_auth::{
        Authenticator, CookieSettings, CredentialVerifier, SessionTokenManager, WorkFactor,
    };
    use usergate_db::Database;

    use super::create_router;
    use crate::state::AppState;

    /// Router over a fresh in-memory store, plus the store itself
    pub async fn test_app() -> (Router, Database) {
        let db = Database::in_memory().await.unwrap();
        let verifier = CredentialVerifier::new(WorkFactor {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        let tokens = Arc::new(SessionTokenManager::new("api-test-secret", 1).unwrap());
        let auth = Authenticator::new(Arc::new(db.clone()), verifier, tokens).unwrap();

        let state = AppState::new(Arc::new(auth), CookieSettings::default());
        (create_router(state, None), db)
    }

    pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
