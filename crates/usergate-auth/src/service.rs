//! Registration and login flow
//!
//! Ties the user store, the credential verifier and the token manager
//! together. Every collaborator is handed in at construction.

use std::sync::Arc;

use tracing::{debug, info};
use usergate_db::{NewUser, User, UserStore};

use crate::error::AuthError;
use crate::jwt::{IdentityClaims, SessionTokenManager};
use crate::password::CredentialVerifier;

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub claims: IdentityClaims,
}

/// Registration and login against a user store
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn UserStore>,
    verifier: CredentialVerifier,
    tokens: Arc<SessionTokenManager>,
    dummy_hash: String,
}

impl Authenticator {
    pub fn new(
        store: Arc<dyn UserStore>,
        verifier: CredentialVerifier,
        tokens: Arc<SessionTokenManager>,
    ) -> Result<Self, AuthError> {
        // Unknown usernames are verified against this, at the same work factor
        let dummy_hash = verifier.hash("usergate-unknown-user")?;

        Ok(Self {
            store,
            verifier,
            tokens,
            dummy_hash,
        })
    }

    /// Token manager shared with the request gate
    pub fn tokens(&self) -> &Arc<SessionTokenManager> {
        &self.tokens
    }

    /// Register a new user
    ///
    /// Store failures, including a duplicate username, are returned as-is.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let password_hash = self.verifier.hash_blocking(password.to_string()).await?;

        let user = self
            .store
            .insert_user(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await?;

        info!("Registered user: {}", user.username);
        Ok(user)
    }

    /// Check credentials and issue a session token
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        debug!("Login attempt for user: {}", username);

        let user = self.store.find_by_username(username).await?;

        // Always run a verification so an unknown user costs as much as a wrong password
        let hash_to_verify = match &user {
            Some(u) => u.password_hash.clone(),
            None => self.dummy_hash.clone(),
        };

        let password_valid = self
            .verifier
            .verify_blocking(password.to_string(), hash_to_verify)
            .await?;

        let user = match (user, password_valid) {
            (Some(u), true) => u,
            _ => {
                debug!("Login failed for user: {}", username);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let claims = IdentityClaims {
            id: user.id,
            username: user.username,
        };
        let token = self.tokens.issue(&claims)?;

        info!("User {} logged in successfully", claims.username);

        Ok(LoginOutcome { token, claims })
    }

    /// All registered users
    pub async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.store.list_users().await?)
    }
}
