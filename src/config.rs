//! Configuration module for the Shop Sphere authentication backend.

use serde::Deserialize;
use std::path::Path;

use crate::{AuthError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Empty means permissive (development).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/shopsphere.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret key used to sign session tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Session token lifetime in seconds. The session cookie uses the
    /// same value for its max-age.
    #[serde(default = "default_session_expiry")]
    pub session_expiry_secs: u64,
    /// Base URL of the client application, used to build reset-password links.
    #[serde(default = "default_client_url")]
    pub client_url: String,
    /// Mark the session cookie as Secure. Disable only for local development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,
}

fn default_jwt_secret() -> String {
    "change-me-in-production".to_string()
}

fn default_session_expiry() -> u64 {
    86_400
}

fn default_client_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_secure_cookies() -> bool {
    true
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            session_expiry_secs: default_session_expiry(),
            client_url: default_client_url(),
            secure_cookies: default_secure_cookies(),
        }
    }
}

/// Outbound mail configuration.
///
/// When `api_token` is empty, outgoing mail is recorded in memory and logged
/// instead of being delivered. Useful for development.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Transactional mail API endpoint.
    #[serde(default = "default_mail_api_url")]
    pub api_url: String,
    /// API token for the mail provider.
    #[serde(default)]
    pub api_token: String,
    /// Sender address for all outgoing mail.
    #[serde(default = "default_sender_email")]
    pub sender_email: String,
    /// Sender display name.
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
}

fn default_mail_api_url() -> String {
    "https://send.api.mailtrap.io/api/send".to_string()
}

fn default_sender_email() -> String {
    "no-reply@shopsphere.example".to_string()
}

fn default_sender_name() -> String {
    "Shop Sphere".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_url: default_mail_api_url(),
            api_token: String::new(),
            sender_email: default_sender_email(),
            sender_name: default_sender_name(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file path. Console-only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Outbound mail settings.
    #[serde(default)]
    pub mail: MailConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AuthError::Config(e.to_string()))
    }
}
