//! Usergate Database Layer
//!
//! This crate provides the user store for Usergate: the `UserStore`
//! contract consumed by the authentication core, and its SQLite
//! implementation via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod store;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;
pub use store::UserStore;

/// Re-export sqlx types for convenience
pub use sqlx::SqlitePool;
