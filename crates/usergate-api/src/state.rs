//! Application state

use std::sync::Arc;
use usergate_auth::{Authenticator, CookieSettings, SessionTokenManager};

pub use metrics_exporter_prometheus::PrometheusHandle as MetricsHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<Authenticator>,
    pub cookies: CookieSettings,
}

impl AppState {
    pub fn new(auth: Arc<Authenticator>, cookies: CookieSettings) -> Self {
        Self { auth, cookies }
    }

    /// Token manager used by the session gate
    pub fn tokens(&self) -> Arc<SessionTokenManager> {
        self.auth.tokens().clone()
    }
}
