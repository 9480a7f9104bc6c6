#![allow(dead_code)]

use async_trait::async_trait;
use bson::oid::ObjectId;
use estimate_backend::config::EstimateConfig;
use estimate_backend::form::StagedImage;
use estimate_backend::model::lead::Lead;
use estimate_backend::model::service_details::{
    ContactDetails, CustomHaulingDetails, HomeType, JunkRemovalDetails, MovingDetails, YesNo,
};
use estimate_backend::repository::lead_repo::LeadRepository;
use estimate_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use estimate_backend::service::lead_service::LeadServiceImpl;
use estimate_backend::service::upload_service::{ImageUploader, UploadError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Small limits and short timeouts so failure paths finish quickly
pub fn test_config() -> EstimateConfig {
    EstimateConfig {
        max_image_bytes: 1024,
        max_images: 5,
        upload_timeout: Duration::from_millis(200),
        create_timeout: Duration::from_millis(200),
    }
}

/// In-memory lead store that records every insert
#[derive(Default)]
pub struct RecordingLeadRepo {
    pub leads: Mutex<Vec<Lead>>,
    pub calls: Mutex<usize>,
    pub fail: bool,
    pub delay: Option<Duration>,
}

impl RecordingLeadRepo {
    pub fn failing() -> Self {
        RecordingLeadRepo { fail: true, ..Default::default() }
    }

    pub fn slow(delay: Duration) -> Self {
        RecordingLeadRepo { delay: Some(delay), ..Default::default() }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    pub fn stored(&self) -> Vec<Lead> {
        self.leads.lock().unwrap().clone()
    }
}

#[async_trait]
impl LeadRepository for RecordingLeadRepo {
    async fn create(&self, lead: Lead) -> RepositoryResult<Lead> {
        *self.calls.lock().unwrap() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(RepositoryError::database("connection reset by peer"));
        }
        let mut lead = lead;
        lead.id = Some(ObjectId::new());
        lead.created_at = Some("2026-01-01T00:00:00Z".to_string());
        self.leads.lock().unwrap().push(lead.clone());
        Ok(lead)
    }
}

/// Uploader that hands out fake CDN links and fails for the listed file names
#[derive(Default)]
pub struct FakeUploader {
    pub fail_names: Vec<String>,
    pub hang_names: Vec<String>,
    pub uploaded: Mutex<Vec<String>>,
}

impl FakeUploader {
    pub fn failing_on(names: &[&str]) -> Self {
        FakeUploader {
            fail_names: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn hanging_on(names: &[&str]) -> Self {
        FakeUploader {
            hang_names: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn uploaded(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageUploader for FakeUploader {
    async fn upload(&self, image: &StagedImage) -> Result<String, UploadError> {
        if self.hang_names.contains(&image.file_name) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        if self.fail_names.contains(&image.file_name) {
            return Err(UploadError::Other(format!("{} rejected", image.file_name)));
        }
        self.uploaded.lock().unwrap().push(image.file_name.clone());
        Ok(format!("https://cdn.test/lead-images/{}", image.file_name))
    }
}

pub fn lead_service(repo: Arc<RecordingLeadRepo>, uploader: Arc<FakeUploader>) -> LeadServiceImpl {
    LeadServiceImpl::new(repo, uploader, &test_config())
}

pub fn image(name: &str, size: usize) -> StagedImage {
    StagedImage::new(name, "image/jpeg", vec![0u8; size])
}

pub fn contact() -> ContactDetails {
    ContactDetails {
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone: "4165550123".to_string(),
    }
}

pub fn moving() -> MovingDetails {
    MovingDetails {
        from_address: "12 Front St W, Toronto".to_string(),
        to_address: "400 King St E, Toronto".to_string(),
        home_type: Some(HomeType::TwoBedroom),
        elevator_access: Some(YesNo::Yes),
        heavy_items: Some(true),
        additional_details: None,
    }
}

pub fn hauling() -> CustomHaulingDetails {
    CustomHaulingDetails {
        address: "123 Main St, Toronto, ON".to_string(),
        description: "old couch and 3 boxes, heavy".to_string(),
        additional_details: None,
    }
}

pub fn junk_removal() -> JunkRemovalDetails {
    JunkRemovalDetails {
        address: "55 Queen St E, Toronto".to_string(),
        junk_types: vec!["Furniture".to_string(), "Electronics".to_string()],
        stairs_access: Some(YesNo::No),
        additional_details: None,
    }
}
