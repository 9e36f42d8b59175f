//! Session token issuance and validation

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

/// Identity embedded in a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub id: i64,
    pub username: String,
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Username
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Issues and validates signed session tokens
///
/// Holds only the signing secret, which is fixed at construction, so a
/// single instance is shared by every request.
#[derive(Clone)]
pub struct SessionTokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: TimeDelta,
}

impl SessionTokenManager {
    /// Create a new token manager
    ///
    /// The lifetime must be positive and representable as a `TimeDelta`.
    pub fn new(secret: &str, token_ttl_hours: i64) -> Result<Self, AuthError> {
        let token_ttl = TimeDelta::try_hours(token_ttl_hours)
            .filter(|ttl| *ttl > TimeDelta::zero())
            .ok_or(AuthError::InvalidTokenTtl(token_ttl_hours))?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
        })
    }

    /// Token lifetime in seconds
    pub fn ttl_seconds(&self) -> i64 {
        self.token_ttl.num_seconds()
    }

    /// Issue a token for an authenticated identity
    pub fn issue(&self, identity: &IdentityClaims) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.token_ttl)
            .ok_or(AuthError::InvalidTokenTtl(self.token_ttl.num_hours()))?;

        let claims = Claims {
            sub: identity.id.to_string(),
            username: identity.username.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        debug!("Issuing token for user: {}", identity.username);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(AuthError::Jwt)
    }

    /// Validate a token and return the identity it carries
    pub fn validate(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let validation = Validation::new(Algorithm::HS256);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken,
                }
            })?;

        let id = token_data
            .claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(IdentityClaims {
            id,
            username: token_data.claims.username,
        })
    }
}
