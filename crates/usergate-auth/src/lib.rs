//! Usergate Authentication
//!
//! This crate provides the authentication core for Usergate: Argon2
//! password hashing, signed session tokens, the login/registration
//! flow, and the Axum middleware that gates protected routes.

pub mod cookie;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;

pub use cookie::{AUTH_COOKIE_NAME, CookieSettings, token_from_headers};
pub use error::AuthError;
pub use jwt::{Claims, IdentityClaims, SessionTokenManager};
pub use middleware::{AuthUser, authenticate, require_session};
pub use password::{CredentialVerifier, WorkFactor};
pub use service::{Authenticator, LoginOutcome};
