use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::form::staging::StagedImage;
use crate::util::storage::{StorageError, StorageService};

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Storage rejected upload: {0}")]
    Storage(#[from] StorageError),

    #[error("Upload failed: {0}")]
    Other(String),
}

/// Puts one photo somewhere public and hands back its URL.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, image: &StagedImage) -> Result<String, UploadError>;
}

/// Uploads into the lead photo bucket of the hosted storage.
pub struct StorageImageUploader {
    storage: Arc<StorageService>,
}

impl StorageImageUploader {
    pub fn new(storage: Arc<StorageService>) -> Self {
        Self { storage }
    }
}

/// `<unix millis>-<7 random chars>.<ext>`; files without an extension get `bin`
pub fn storage_key(image: &StagedImage) -> String {
    let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(7).collect();
    let extension = image.extension().unwrap_or_else(|| "bin".to_string());
    format!("{}-{}.{}", Utc::now().timestamp_millis(), suffix, extension)
}

#[async_trait]
impl ImageUploader for StorageImageUploader {
    #[instrument(skip(self, image), fields(file_name = %image.file_name, size = image.size()))]
    async fn upload(&self, image: &StagedImage) -> Result<String, UploadError> {
        let key = storage_key(image);
        debug!(key = %key, "Generated storage key");

        self.storage
            .put_object(&key, image.content.clone(), &image.content_type)
            .await?;

        Ok(self.storage.public_url(&key))
    }
}
