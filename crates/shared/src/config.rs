//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Upstream service configuration.
    pub services: ServicesConfig,
    /// Authorisation toggles.
    #[serde(default)]
    pub auth: AuthConfig,
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
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Upstream service endpoints.
///
/// All calls share one API key (the services sit behind the same gateway)
/// and a per-call deadline ceiling; file uploads and downloads get a longer
/// one.
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    /// API key sent to the upstream gateway.
    pub api_key: String,
    /// Base URL of the filing-transaction service.
    pub transactions_url: String,
    /// Base URL of the company-profile service.
    pub company_profile_url: String,
    /// Base URL of the alpha-key name-normalisation service.
    pub alpha_key_url: String,
    /// Base URL of the file-transfer / anti-virus service.
    pub file_transfer_url: String,
    /// Base URL of the email allow-list service.
    pub allow_list_url: String,
    /// Deadline ceiling for metadata calls, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Deadline ceiling for file uploads and downloads, in seconds.
    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_upload_timeout_secs() -> u64 {
    60
}

/// Authorisation toggles.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Skip the email allow-list interceptor entirely.
    #[serde(default)]
    pub disable_allow_list: bool,
    /// Expose the non-live route handlers (the filings view).
    #[serde(default)]
    pub enable_non_live_routes: bool,
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
            .add_source(config::Environment::with_prefix("WINDUP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
