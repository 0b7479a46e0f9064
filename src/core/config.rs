//! Configuration management for the portal.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use super::transport::HttpConfig;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::{info, warn};

/// Main configuration structure for the portal.
///
/// This struct contains all configurable aspects of the server, organized
/// by concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP transport configuration.
    pub transport: HttpConfig,

    /// Credentials guarding quote creation.
    pub auth: AuthConfig,

    /// URL shortener settings.
    pub shortener: ShortenerConfig,

    /// Input bounds for the random data generator.
    pub limits: LimitsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Static Basic credentials for gated operations.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,

    /// Realm announced in the `WWW-Authenticate` challenge.
    pub realm: String,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("realm", &self.realm)
            .finish()
    }
}

/// URL shortener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenerConfig {
    /// Base used to build `short_url` in responses, e.g. `https://sho.rt`.
    /// When unset, `http://<Host header>` is used.
    pub public_base_url: Option<String>,

    /// Length of generated codes.
    pub code_length: usize,

    /// Regeneration attempts after a code collision before giving up.
    pub max_attempts: usize,
}

/// Bounds applied by the random data generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Largest allowed `max - min` for random numbers.
    pub max_number_span: u64,

    /// Largest allowed absolute value of `min` or `max`.
    pub max_number_abs: u64,

    /// Shortest password that may be generated.
    pub min_password_length: usize,

    /// Longest password that may be generated.
    pub max_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            // Demo credentials; override with PORTAL_AUTH_PASSWORD.
            password: "supersecretpassword123".to_string(),
            realm: "Quote submission requires authentication".to_string(),
        }
    }
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            public_base_url: None,
            code_length: 6,
            max_attempts: 10,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_number_span: 1_000_000,
            max_number_abs: 5_000_000,
            min_password_length: 6,
            max_password_length: 128,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "service-portal".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: HttpConfig::default(),
            auth: AuthConfig::default(),
            shortener: ShortenerConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `PORTAL_`.
    /// For example: `PORTAL_SERVER_NAME`, `PORTAL_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("PORTAL_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("PORTAL_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = HttpConfig::from_env();

        if let Ok(username) = std::env::var("PORTAL_AUTH_USERNAME") {
            config.auth.username = username;
        }
        if let Ok(password) = std::env::var("PORTAL_AUTH_PASSWORD") {
            config.auth.password = password;
            info!("Quote submission password loaded from environment");
        } else {
            warn!(
                "Using the built-in demo password for quote submission. \
                 Set PORTAL_AUTH_PASSWORD to override it."
            );
        }
        if let Ok(realm) = std::env::var("PORTAL_AUTH_REALM") {
            config.auth.realm = realm;
        }

        if let Ok(base) = std::env::var("PORTAL_PUBLIC_BASE_URL") {
            let base = base.trim_end_matches('/').to_string();
            if !base.is_empty() {
                info!("Short links will use base URL {}", base);
                config.shortener.public_base_url = Some(base);
            }
        }
        config.shortener.code_length =
            env_or("PORTAL_SHORT_CODE_LENGTH", config.shortener.code_length);
        config.shortener.max_attempts =
            env_or("PORTAL_SHORT_CODE_ATTEMPTS", config.shortener.max_attempts);

        config.limits.max_number_span =
            env_or("PORTAL_RANDOM_MAX_SPAN", config.limits.max_number_span);
        config.limits.max_number_abs =
            env_or("PORTAL_RANDOM_MAX_ABS", config.limits.max_number_abs);
        config.limits.min_password_length =
            env_or("PORTAL_PASSWORD_MIN_LENGTH", config.limits.min_password_length);
        config.limits.max_password_length =
            env_or("PORTAL_PASSWORD_MAX_LENGTH", config.limits.max_password_length);

        config.enforce_limits();
        config
    }

    /// Reset values that would leave a service unusable back to their defaults.
    fn enforce_limits(&mut self) {
        if self.shortener.code_length == 0 {
            let default = ShortenerConfig::default().code_length;
            warn!("Short code length must be at least 1, using default: {default}");
            self.shortener.code_length = default;
        }

        if self.limits.min_password_length > self.limits.max_password_length {
            let default = LimitsConfig::default();
            warn!(
                "Password length bounds {}..={} are inverted, using defaults: {}..={}",
                self.limits.min_password_length,
                self.limits.max_password_length,
                default.min_password_length,
                default.max_password_length
            );
            self.limits.min_password_length = default.min_password_length;
            self.limits.max_password_length = default.max_password_length;
        }
    }
}

/// Parse `key` from the environment, keeping `default` when unset or invalid.
pub(crate) fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?} ({e}), using default: {default}");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    pub(crate) static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_auth_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("PORTAL_AUTH_USERNAME", "editor");
            std::env::set_var("PORTAL_AUTH_PASSWORD", "hunter2");
        }
        let config = Config::from_env();
        assert_eq!(config.auth.username, "editor");
        assert_eq!(config.auth.password, "hunter2");
        unsafe {
            std::env::remove_var("PORTAL_AUTH_USERNAME");
            std::env::remove_var("PORTAL_AUTH_PASSWORD");
        }
    }

    #[test]
    fn test_auth_default_fallback() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("PORTAL_AUTH_USERNAME");
            std::env::remove_var("PORTAL_AUTH_PASSWORD");
        }
        let config = Config::from_env();
        assert_eq!(config.auth.username, "admin");
        assert_eq!(config.auth.password, "supersecretpassword123");
    }

    #[test]
    fn test_invalid_numeric_env_keeps_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("PORTAL_RANDOM_MAX_SPAN", "lots");
            std::env::set_var("PORTAL_PASSWORD_MAX_LENGTH", "64");
        }
        let config = Config::from_env();
        assert_eq!(config.limits.max_number_span, 1_000_000);
        assert_eq!(config.limits.max_password_length, 64);
        unsafe {
            std::env::remove_var("PORTAL_RANDOM_MAX_SPAN");
            std::env::remove_var("PORTAL_PASSWORD_MAX_LENGTH");
        }
    }

    #[test]
    fn test_unusable_limits_fall_back_to_defaults() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("PORTAL_SHORT_CODE_LENGTH", "0");
            std::env::set_var("PORTAL_PASSWORD_MIN_LENGTH", "50");
            std::env::set_var("PORTAL_PASSWORD_MAX_LENGTH", "20");
        }
        let config = Config::from_env();
        assert_eq!(config.shortener.code_length, 6);
        assert_eq!(config.limits.min_password_length, 6);
        assert_eq!(config.limits.max_password_length, 128);
        unsafe {
            std::env::remove_var("PORTAL_SHORT_CODE_LENGTH");
            std::env::remove_var("PORTAL_PASSWORD_MIN_LENGTH");
            std::env::remove_var("PORTAL_PASSWORD_MAX_LENGTH");
        }
    }

    #[test]
    fn test_equal_password_bounds_are_kept() {
        let mut config = Config::default();
        config.limits.min_password_length = 12;
        config.limits.max_password_length = 12;
        config.enforce_limits();
        assert_eq!(config.limits.min_password_length, 12);
        assert_eq!(config.limits.max_password_length, 12);
    }

    #[test]
    fn test_public_base_url_trailing_slash_trimmed() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("PORTAL_PUBLIC_BASE_URL", "https://sho.rt/");
        }
        let config = Config::from_env();
        assert_eq!(
            config.shortener.public_base_url.as_deref(),
            Some("https://sho.rt")
        );
        unsafe {
            std::env::remove_var("PORTAL_PUBLIC_BASE_URL");
        }
    }

    #[test]
    fn test_password_redacted_in_debug() {
        let auth = AuthConfig {
            username: "admin".to_string(),
            password: "super_secret_value".to_string(),
            realm: "r".to_string(),
        };
        let debug_str = format!("{:?}", auth);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_value"));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.transport.port, 5001);
        assert_eq!(config.shortener.code_length, 6);
        assert_eq!(config.limits.min_password_length, 6);
        assert_eq!(config.limits.max_password_length, 128);
    }
}
