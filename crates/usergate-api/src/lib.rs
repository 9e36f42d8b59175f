//! Usergate REST API
//!
//! This crate provides the Axum-based HTTP API for Usergate:
//! registration, login and the session-gated user listing.

pub mod cors;
pub mod error;
pub mod routes;
pub mod state;

pub use cors::cors_layer;
pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
