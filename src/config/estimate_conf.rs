use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::ConfigError;

/// 5 MiB
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_MAX_IMAGES: usize = 5;

/// Limits applied to one estimate form session and its submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimateConfig {
    pub max_image_bytes: usize,
    pub max_images: usize,
    /// Bound on each photo upload; an expired upload counts as a failed one
    pub upload_timeout: Duration,
    /// Bound on the lead insert; expiry fails the attempt
    pub create_timeout: Duration,
}

impl EstimateConfig {
    /// Load estimate limits from environment variables, all optional:
    /// ESTIMATE_MAX_IMAGE_BYTES, ESTIMATE_MAX_IMAGES,
    /// ESTIMATE_UPLOAD_TIMEOUT_SECS, ESTIMATE_CREATE_TIMEOUT_SECS
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading estimate form configuration");
        let defaults = Self::default();

        let config = Self {
            max_image_bytes: env_or("ESTIMATE_MAX_IMAGE_BYTES", defaults.max_image_bytes)?,
            max_images: env_or("ESTIMATE_MAX_IMAGES", defaults.max_images)?,
            upload_timeout: Duration::from_secs(env_or(
                "ESTIMATE_UPLOAD_TIMEOUT_SECS",
                defaults.upload_timeout.as_secs(),
            )?),
            create_timeout: Duration::from_secs(env_or(
                "ESTIMATE_CREATE_TIMEOUT_SECS",
                defaults.create_timeout.as_secs(),
            )?),
        };
        config.validate()?;
        debug!(?config, "Estimate configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_image_bytes == 0 {
            return Err(ConfigError::ValidationError("Max image size must be greater than 0".to_string()));
        }
        if self.max_images == 0 {
            return Err(ConfigError::ValidationError("Max image count must be greater than 0".to_string()));
        }
        if self.upload_timeout.is_zero() || self.create_timeout.is_zero() {
            return Err(ConfigError::ValidationError("Timeouts must be greater than 0".to_string()));
        }
        Ok(())
    }
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_images: DEFAULT_MAX_IMAGES,
            upload_timeout: Duration::from_secs(30),
            create_timeout: Duration::from_secs(15),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| {
            error!("Invalid {} value: {}", key, raw);
            ConfigError::InvalidValue(format!("Invalid {} value", key))
        }),
        Err(_) => Ok(default),
    }
}
