//! Configuration loading

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use usergate_auth::{CookieSettings, WorkFactor};

/// Secret used when none is configured. Only fit for local development.
pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// Longest accepted token lifetime: ten years
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Token lifetime; the default matches the 30-day cookie
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    /// Mark the session cookie `Secure` (HTTPS only)
    #[serde(default)]
    pub cookie_secure: bool,
    #[serde(default = "default_hash_memory_kib")]
    pub hash_memory_kib: u32,
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
    /// Upper bound on a single hash or verify; 0 disables the bound
    #[serde(default = "default_hash_timeout_secs")]
    pub hash_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_hours: default_token_ttl_hours(),
            cookie_secure: false,
            hash_memory_kib: default_hash_memory_kib(),
            hash_iterations: default_hash_iterations(),
            hash_parallelism: default_hash_parallelism(),
            hash_timeout_secs: default_hash_timeout_secs(),
        }
    }
}

impl AuthConfig {
    pub fn work_factor(&self) -> WorkFactor {
        WorkFactor {
            memory_kib: self.hash_memory_kib,
            iterations: self.hash_iterations,
            parallelism: self.hash_parallelism,
        }
    }

    pub fn hash_timeout(&self) -> Option<Duration> {
        (self.hash_timeout_secs > 0).then(|| Duration::from_secs(self.hash_timeout_secs))
    }

    /// Cookie lifetime follows the token lifetime
    pub fn cookie_settings(&self) -> Result<CookieSettings> {
        let max_age_secs = self
            .token_ttl_hours
            .checked_mul(3600)
            .with_context(|| {
                format!(
                    "auth.token_ttl_hours {} overflows the cookie lifetime",
                    self.token_ttl_hours
                )
            })?;

        Ok(CookieSettings {
            max_age_secs,
            secure: self.cookie_secure,
        })
    }
}

/// CORS configuration
///
/// Origins must be listed explicitly since the session cookie is sent with
/// credentialed requests. An empty list disables CORS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_db_path() -> String {
    "./data/usergate.db".to_string()
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_token_ttl_hours() -> i64 {
    24 * 30
}

fn default_hash_memory_kib() -> u32 {
    19 * 1024
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}

fn default_hash_timeout_secs() -> u64 {
    10
}

// The web client's dev server and the API's own origin
fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5000".to_string(),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        // Check if config file exists
        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            bail!("auth.jwt_secret must not be empty");
        }
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.auth.token_ttl_hours) {
            bail!(
                "auth.token_ttl_hours must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_HOURS,
                self.auth.token_ttl_hours
            );
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            bail!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            );
        }
        if self.auth.jwt_secret == DEFAULT_JWT_SECRET {
            warn!("Using the built-in development JWT secret; set auth.jwt_secret or USERGATE_JWT_SECRET");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use usergate_auth::{IdentityClaims, SessionTokenManager};

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = Config::load(path.to_str().unwrap()).unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.token_ttl_hours, 720);
        assert_eq!(config.auth.jwt_secret, DEFAULT_JWT_SECRET);
        assert!(config.metrics.enabled);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://localhost:3000", "http://localhost:5000"]
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8080

[auth]
jwt_secret = "s3cret"
cookie_secure = true

[cors]
allowed_origins = ["http://localhost:5173"]
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.hash_iterations, 2);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.validate().is_ok());

        let cookies = config.auth.cookie_settings().unwrap();
        assert!(cookies.secure);
        assert_eq!(cookies.max_age_secs, 720 * 3600);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        assert!(Config::load(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.auth.jwt_secret = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.auth.token_ttl_hours = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.auth.token_ttl_hours = MAX_TOKEN_TTL_HOURS + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.auth.token_ttl_hours = 1_000_000_000_000;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_longest_valid_ttl_is_usable() {
        let mut config = Config::default();
        config.auth.token_ttl_hours = MAX_TOKEN_TTL_HOURS;
        assert!(config.validate().is_ok());

        let cookies = config.auth.cookie_settings().unwrap();
        assert_eq!(cookies.max_age_secs, MAX_TOKEN_TTL_HOURS * 3600);

        let tokens =
            SessionTokenManager::new(&config.auth.jwt_secret, config.auth.token_ttl_hours)
                .unwrap();
        let identity = IdentityClaims {
            id: 1,
            username: "alice".to_string(),
        };
        let token = tokens.issue(&identity).unwrap();
        assert_eq!(tokens.validate(&token).unwrap(), identity);
    }

    #[test]
    fn test_cookie_lifetime_overflow_is_an_error() {
        let auth = AuthConfig {
            token_ttl_hours: i64::MAX / 1000,
            ..AuthConfig::default()
        };
        assert!(auth.cookie_settings().is_err());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/default.toml");
        let config = Config::load(path).unwrap();
        assert!(config.validate().is_ok());

        let defaults = Config::default();
        assert_eq!(config.server.port, defaults.server.port);
        assert_eq!(config.cors.allowed_origins, defaults.cors.allowed_origins);
        assert_eq!(config.auth.token_ttl_hours, defaults.auth.token_ttl_hours);
    }

    #[test]
    fn test_hash_timeout_zero_disables() {
        let mut auth = AuthConfig::default();
        assert_eq!(auth.hash_timeout(), Some(Duration::from_secs(10)));

        auth.hash_timeout_secs = 0;
        assert_eq!(auth.hash_timeout(), None);
    }
}
