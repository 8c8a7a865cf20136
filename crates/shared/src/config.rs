//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Receipt upload configuration.
    #[serde(default)]
    pub uploads: UploadConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Token expiration in hours.
    #[serde(default = "default_token_expiry")]
    pub token_expires_hours: i64,
}

fn default_token_expiry() -> i64 {
    24
}

/// Receipt upload configuration.
///
/// The staging directory is never web-addressable; the receipts directory is
/// served read-only under the public prefix.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Staging directory for in-flight uploads.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: String,
    /// Durable directory for promoted receipts.
    #[serde(default = "default_receipts_dir")]
    pub receipts_dir: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            staging_dir: default_staging_dir(),
            receipts_dir: default_receipts_dir(),
        }
    }
}

fn default_staging_dir() -> String {
    "uploads/temp".to_string()
}

fn default_receipts_dir() -> String {
    "uploads/receipts".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("RECIBO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
