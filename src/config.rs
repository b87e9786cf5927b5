//! Configuration management for the library console

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Remote library API the console talks to
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, without the `/api` prefix
    pub base_url: String,
    /// Per-request timeout in seconds; 0 leaves requests unbounded
    pub timeout_seconds: u64,
    /// Largest cover image accepted by the upload form
    pub max_upload_bytes: usize,
}

/// Session cookie settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub access_token_days: i64,
    pub refresh_token_days: i64,
    pub secure_cookies: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (CONSOLE_API__BASE_URL, CONSOLE_SERVER__PORT, ...)
            .add_source(
                Environment::with_prefix("CONSOLE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override the remote API location from API_BASE_URL if present
            .set_override_option("api.base_url", env::var("API_BASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_seconds: 0,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_token_days: 1,
            refresh_token_days: 7,
            secure_cookies: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cookie_lifetimes() {
        let config = AppConfig::default();
        assert_eq!(config.session.access_token_days, 1);
        assert_eq!(config.session.refresh_token_days, 7);
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.timeout_seconds, 0);
        assert_eq!(config.api.max_upload_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn test_partial_source_fills_defaults() {
        let config: AppConfig = Config::builder()
            .set_override("api.base_url", "http://library.test")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.api.base_url, "http://library.test");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.format, "pretty");
    }
}
