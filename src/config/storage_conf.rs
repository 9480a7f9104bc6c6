use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// Hosted object storage that receives the estimate photos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Project base URL, e.g. "https://abcd.supabase.co"
    pub base_url: String,
    /// Service key sent as both bearer token and `apikey` header
    pub api_key: String,
    pub bucket_name: String,
    pub request_timeout_secs: u64,
}

impl StorageConfig {
    /// Load storage configuration from environment variables
    ///
    /// Expected environment variables:
    /// - STORAGE_URL: storage project base URL (required)
    /// - STORAGE_API_KEY: service key (required)
    /// - STORAGE_BUCKET: bucket for lead photos (defaults to "lead-images")
    /// - STORAGE_REQUEST_TIMEOUT: HTTP timeout in seconds (defaults to 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading storage configuration from environment variables");

        let base_url = env::var("STORAGE_URL")
            .map_err(|_| {
                error!("STORAGE_URL environment variable not found");
                ConfigError::EnvVarNotFound("STORAGE_URL".to_string())
            })?;
        debug!("Storage base url: {}", base_url);

        let api_key = env::var("STORAGE_API_KEY")
            .map_err(|_| {
                error!("STORAGE_API_KEY environment variable not found");
                ConfigError::EnvVarNotFound("STORAGE_API_KEY".to_string())
            })?;
        debug!("Storage api key loaded (length: {} chars)", api_key.len());

        let bucket_name = env::var("STORAGE_BUCKET").unwrap_or_else(|_| {
            warn!("STORAGE_BUCKET not set, using default: lead-images");
            "lead-images".to_string()
        });

        let request_timeout_secs = env::var("STORAGE_REQUEST_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|_| {
                error!("Invalid STORAGE_REQUEST_TIMEOUT value");
                ConfigError::InvalidValue("Invalid STORAGE_REQUEST_TIMEOUT value".to_string())
            })?;

        let config = Self {
            base_url,
            api_key,
            bucket_name,
            request_timeout_secs,
        };
        config.validate()?;

        info!("Storage configuration loaded successfully");
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            error!("Storage url must be http(s): {}", self.base_url);
            return Err(ConfigError::ValidationError(
                "Storage url must start with http:// or https://".to_string(),
            ));
        }

        if self.api_key.is_empty() {
            error!("Storage api key is empty");
            return Err(ConfigError::ValidationError("Api key cannot be empty".to_string()));
        }

        if !self
            .bucket_name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
        {
            error!("Invalid bucket name format: {}", self.bucket_name);
            return Err(ConfigError::ValidationError(
                "Bucket name contains invalid characters".to_string(),
            ));
        }

        if self.bucket_name.len() < 3 || self.bucket_name.len() > 63 {
            error!("Invalid bucket name length: {}", self.bucket_name.len());
            return Err(ConfigError::ValidationError(
                "Bucket name must be between 3 and 63 characters".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "Storage request timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Base url without a trailing slash
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: "local-service-key".to_string(),
            bucket_name: "lead-images".to_string(),
            request_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StorageConfig::default();
        assert_eq!(config.bucket_name, "lead-images");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = StorageConfig::default();
        config.base_url = "localhost:54321".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_bucket_name() {
        let mut config = StorageConfig::default();
        config.bucket_name = "ab".to_string();
        assert!(config.validate().is_err());

        config.bucket_name = "Lead_Images".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trimmed_base_url() {
        let mut config = StorageConfig::default();
        config.base_url = "https://project.example.co/".to_string();
        assert_eq!(config.trimmed_base_url(), "https://project.example.co");
    }
}
