//! Password hashing and verification with Argon2id

use std::time::Duration;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::debug;

use crate::error::AuthError;

/// Argon2 cost parameters applied to every new hash
///
/// Existing hashes carry their own parameters in the PHC string, so
/// changing the work factor never invalidates stored passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkFactor {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for WorkFactor {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Hashes plaintext passwords and checks login attempts against stored hashes
#[derive(Clone)]
pub struct CredentialVerifier {
    argon2: Argon2<'static>,
    timeout: Option<Duration>,
}

impl CredentialVerifier {
    /// Create a verifier with the given work factor
    pub fn new(work_factor: WorkFactor) -> Result<Self, AuthError> {
        let params = Params::new(
            work_factor.memory_kib,
            work_factor.iterations,
            work_factor.parallelism,
            None,
        )
        .map_err(|e| AuthError::PasswordHash(format!("invalid work factor: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            timeout: None,
        })
    }

    /// Bound how long the async entry points wait for a hashing task
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    /// Verify a password against an encoded hash
    ///
    /// A wrong password is `Ok(false)`. Only a hash that cannot be parsed
    /// or evaluated is an error.
    pub fn verify(&self, plaintext: &str, encoded_hash: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(encoded_hash).map_err(|e| AuthError::MalformedHash(e.to_string()))?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::MalformedHash(e.to_string())),
        }
    }

    /// Hash on the blocking thread pool so the async runtime keeps serving
    /// other requests
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, AuthError> {
        let verifier = self.clone();
        self.run_blocking(move || verifier.hash(&plaintext)).await
    }

    /// Verify on the blocking thread pool
    pub async fn verify_blocking(
        &self,
        plaintext: String,
        encoded_hash: String,
    ) -> Result<bool, AuthError> {
        let verifier = self.clone();
        self.run_blocking(move || verifier.verify(&plaintext, &encoded_hash))
            .await
    }

    async fn run_blocking<T, F>(&self, work: F) -> Result<T, AuthError>
    where
        F: FnOnce() -> Result<T, AuthError> + Send + 'static,
        T: Send + 'static,
    {
        let task = tokio::task::spawn_blocking(work);

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    debug!("Password hashing exceeded {:?}", limit);
                    return Err(AuthError::HashTimeout);
                }
            },
            None => task.await,
        };

        joined.map_err(|e| AuthError::PasswordHash(format!("hashing task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> CredentialVerifier {
        CredentialVerifier::new(WorkFactor {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let verifier = cheap();
        let hash = verifier.hash("pw123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("pw123"));
        assert!(verifier.verify("pw123", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_is_false_not_error() {
        let verifier = cheap();
        let hash = verifier.hash("pw123").unwrap();

        assert!(!verifier.verify("wrong", &hash).unwrap());
        assert!(!verifier.verify("", &hash).unwrap());
        assert!(!verifier.verify("pw1234", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let verifier = cheap();
        let first = verifier.hash("pw123").unwrap();
        let second = verifier.hash("pw123").unwrap();

        assert_ne!(first, second);
        assert!(verifier.verify("pw123", &first).unwrap());
        assert!(verifier.verify("pw123", &second).unwrap());
    }

    #[test]
    fn test_hash_records_work_factor() {
        let hash = cheap().hash("pw123").unwrap();
        assert!(hash.contains("m=8,t=1,p=1"));

        // Parameters come from the stored hash, not from the verifier
        let other = CredentialVerifier::new(WorkFactor {
            memory_kib: 16,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(other.verify("pw123", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        let verifier = cheap();

        let result = verifier.verify("pw123", "pw123");
        assert!(matches!(result, Err(AuthError::MalformedHash(_))));

        let result = verifier.verify("pw123", "");
        assert!(matches!(result, Err(AuthError::MalformedHash(_))));
    }

    #[test]
    fn test_invalid_work_factor() {
        let result = CredentialVerifier::new(WorkFactor {
            memory_kib: 0,
            iterations: 0,
            parallelism: 0,
        });
        assert!(matches!(result, Err(AuthError::PasswordHash(_))));
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let verifier = cheap();
        let hash = verifier.hash_blocking("pw123".to_string()).await.unwrap();

        assert!(verifier
            .verify_blocking("pw123".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verifier
            .verify_blocking("nope".to_string(), hash)
            .await
            .unwrap());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_hashing_leaves_runtime_free() {
        let verifier = CredentialVerifier::new(WorkFactor {
            memory_kib: 64 * 1024,
            iterations: 4,
            parallelism: 1,
        })
        .unwrap();
        let tokens = crate::jwt::SessionTokenManager::new("runtime-secret", 1).unwrap();
        let token = tokens
            .issue(&crate::jwt::IdentityClaims {
                id: 1,
                username: "alice".to_string(),
            })
            .unwrap();

        let hashing =
            tokio::spawn(async move { verifier.hash_blocking("pw123".to_string()).await });

        // The only runtime thread keeps serving other tasks while the hash runs.
        // Were hashing done inline, the hash task would hold this thread until
        // it finished and the sleep would only return afterwards.
        tokio::time::sleep(Duration::from_millis(5)).await;
        let validated = tokio::spawn(async move { tokens.validate(&token) })
            .await
            .unwrap();
        assert!(validated.is_ok());
        assert!(!hashing.is_finished(), "hash finished before a concurrent task ran");

        assert!(hashing.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_hash_timeout() {
        let verifier = CredentialVerifier::new(WorkFactor {
            memory_kib: 64 * 1024,
            iterations: 8,
            parallelism: 1,
        })
        .unwrap()
        .with_timeout(Some(Duration::from_millis(1)));

        let result = verifier.hash_blocking("pw123".to_string()).await;
        assert!(matches!(result, Err(AuthError::HashTimeout)));
    }
}
