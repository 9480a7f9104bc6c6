use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::config::StorageConfig;

/// Client for the hosted object storage REST API that keeps lead photos.
#[derive(Debug, Clone)]
pub struct StorageService {
    client: Client,
    pub config: StorageConfig,
}

impl StorageService {
    /// Create the client and make sure the photo bucket exists
    #[instrument(skip(config), fields(base_url = %config.base_url, bucket = %config.bucket_name))]
    pub async fn new(config: StorageConfig) -> Result<Self, StorageError> {
        info!("Initializing storage service");
        let service = Self::connect(config)?;
        service.ensure_bucket_exists().await?;
        info!("Storage service initialized successfully");
        Ok(service)
    }

    /// Build the client without touching the network
    pub fn connect(config: StorageConfig) -> Result<Self, StorageError> {
        config.validate().map_err(|e| {
            error!("Storage configuration validation failed: {}", e);
            StorageError::ConfigError(e.to_string())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                error!("Failed to create storage client: {}", e);
                StorageError::ConnectionError(format!("Client creation failed: {}", e))
            })?;

        Ok(Self { client, config })
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.config.api_key)
            .header("apikey", &self.config.api_key)
    }

    #[instrument(skip(self))]
    async fn ensure_bucket_exists(&self) -> Result<(), StorageError> {
        let bucket = &self.config.bucket_name;
        let url = format!("{}/storage/v1/bucket/{}", self.config.trimmed_base_url(), bucket);

        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| StorageError::ConnectionError(format!("Bucket lookup failed: {}", e)))?;

        if response.status().is_success() {
            info!("Bucket '{}' already exists", bucket);
            return Ok(());
        }

        warn!("Bucket '{}' not found (status {}), creating it", bucket, response.status());

        let create_url = format!("{}/storage/v1/bucket", self.config.trimmed_base_url());
        let response = self
            .authorized(self.client.post(&create_url))
            .json(&json!({ "id": bucket, "name": bucket, "public": true }))
            .send()
            .await
            .map_err(|e| StorageError::ConnectionError(format!("Bucket creation failed: {}", e)))?;

        check_status(response).await?;
        info!("Successfully created bucket '{}'", bucket);
        Ok(())
    }

    /// Upload an object into the configured bucket. Existing keys are not overwritten.
    #[instrument(skip(self, data), fields(key = %key, size = data.len()))]
    pub async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.starts_with('/') {
            return Err(StorageError::InvalidArguments(format!("Invalid object key: {:?}", key)));
        }

        debug!("Uploading object '{}' to bucket '{}'", key, self.config.bucket_name);

        let content_type = if content_type.is_empty() {
            "application/octet-stream"
        } else {
            content_type
        };

        let response = self
            .authorized(self.client.post(self.object_url(key)))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(|e| {
                error!("Upload request for '{}' failed: {}", key, e);
                StorageError::ConnectionError(format!("Upload failed: {}", e))
            })?;

        check_status(response).await?;
        info!("Successfully uploaded object '{}'", key);
        Ok(())
    }

    /// Authenticated endpoint for writing `key`
    pub fn object_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.trimmed_base_url(),
            self.config.bucket_name,
            key.trim_start_matches('/')
        )
    }

    /// Publicly resolvable link to `key`
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.trimmed_base_url(),
            self.config.bucket_name,
            key.trim_start_matches('/')
        )
    }
}

async fn check_status(response: reqwest::Response) -> Result<(), StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    error!("Storage responded with {}: {}", status, body);
    Err(StorageError::OperationError { status, message: body })
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Storage returned {status}: {message}")]
    OperationError { status: StatusCode, message: String },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> StorageService {
        let config = StorageConfig {
            base_url: "https://project.example.co/".to_string(),
            ..StorageConfig::default()
        };
        StorageService::connect(config).expect("valid config")
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            service().public_url("1700000000000-abc1234.jpg"),
            "https://project.example.co/storage/v1/object/public/lead-images/1700000000000-abc1234.jpg"
        );
    }

    #[test]
    fn test_object_url_strips_leading_slash() {
        assert_eq!(
            service().object_url("/a.png"),
            "https://project.example.co/storage/v1/object/lead-images/a.png"
        );
    }

    #[test]
    fn test_connect_rejects_invalid_config() {
        let config = StorageConfig {
            api_key: String::new(),
            ..StorageConfig::default()
        };
        assert!(matches!(StorageService::connect(config), Err(StorageError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_put_object_rejects_empty_key() {
        let err = service()
            .put_object("", Bytes::from_static(b"x"), "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidArguments(_)));
    }
}
