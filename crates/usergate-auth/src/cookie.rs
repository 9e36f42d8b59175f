//! Session cookie carriage
//!
//! Browsers carry the session token in an `HttpOnly` cookie. Other
//! clients may send it as a bearer token instead.

use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};

/// Cookie name for the session token
pub const AUTH_COOKIE_NAME: &str = "access-token";

/// Default cookie lifetime: 30 days
pub const DEFAULT_COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;

/// Attributes of the session cookie
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub max_age_secs: i64,
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            max_age_secs: DEFAULT_COOKIE_MAX_AGE_SECS,
            secure: false,
        }
    }
}

impl CookieSettings {
    /// `Set-Cookie` value carrying a freshly issued token
    pub fn session_cookie(&self, token: &str) -> String {
        self.build(token, self.max_age_secs)
    }

    /// `Set-Cookie` value that removes the session cookie
    pub fn clear_cookie(&self) -> String {
        self.build("", 0)
    }

    fn build(&self, value: &str, max_age_secs: i64) -> String {
        let mut cookie = format!(
            "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
            AUTH_COOKIE_NAME, value, max_age_secs
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Find the session token in a request
///
/// The `access-token` cookie wins; an `Authorization: Bearer` header is the
/// fallback. Empty values count as absent.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    token_from_cookies(headers).or_else(|| bearer_token(headers))
}

fn token_from_cookies(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE_NAME)
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
