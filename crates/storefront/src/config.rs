//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_API_URL` - Base URL of the commerce API
//!   (default: `http://localhost:8080`)
//! - `STOREFRONT_STATE_PATH` - Path of the durable state file; when unset,
//!   state lives in memory only and does not survive restarts

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default commerce API base URL for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the commerce API.
    pub api_base_url: Url,
    /// Durable state file path; `None` keeps state in memory only.
    pub state_path: Option<PathBuf>,
}

impl StorefrontConfig {
    /// Load configuration from the environment (and `.env`, if present).
    ///
    /// # Errors
    ///
    /// Returns an error if `STOREFRONT_API_URL` is set but not a valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let raw_url =
            std::env::var("STOREFRONT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let state_path = std::env::var("STOREFRONT_STATE_PATH").ok().map(PathBuf::from);

        Self::from_parts(&raw_url, state_path)
    }

    /// Build configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw_url` is not a valid URL.
    pub fn from_parts(raw_url: &str, state_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let api_base_url = raw_url.parse().map_err(|e: url::ParseError| {
            ConfigError::InvalidEnvVar("STOREFRONT_API_URL".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            state_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url_parses() {
        let config = StorefrontConfig::from_parts(DEFAULT_API_URL, None).unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.state_path, None);
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let err = StorefrontConfig::from_parts("not a url", None).unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_API_URL"));
    }

    #[test]
    fn test_state_path_is_carried_through() {
        let config =
            StorefrontConfig::from_parts(DEFAULT_API_URL, Some(PathBuf::from("/tmp/state.json")))
                .unwrap();
        assert_eq!(config.state_path, Some(PathBuf::from("/tmp/state.json")));
    }
}
