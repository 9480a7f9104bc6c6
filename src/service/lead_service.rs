use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use crate::config::EstimateConfig;
use crate::form::staging::StagedImage;
use crate::model::lead::Lead;
use crate::model::service_details::{ContactDetails, ServiceDetails};
use crate::repository::lead_repo::LeadRepository;
use crate::service::upload_service::ImageUploader;
use crate::util::error::ServiceError;

pub const SUBMISSION_FAILED_MESSAGE: &str = "Submission failed. Please try again or call us directly.";
pub const IMAGES_NOT_ATTACHED_MESSAGE: &str =
    "Your photos could not be attached, but your request was still submitted.";

/// What one submit attempt produced, for the presentation layer to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// Stored with every staged photo attached (or none were staged)
    Submitted { lead: Lead },
    /// Stored, but some photos failed to upload and were left out
    SubmittedWithSkippedImages { lead: Lead, attached: usize, skipped: usize },
    /// The lead was not stored; the draft should be kept for a retry
    Failed { reason: String },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, SubmissionOutcome::Failed { .. })
    }

    pub fn lead(&self) -> Option<&Lead> {
        match self {
            SubmissionOutcome::Submitted { lead } | SubmissionOutcome::SubmittedWithSkippedImages { lead, .. } => {
                Some(lead)
            }
            SubmissionOutcome::Failed { .. } => None,
        }
    }

    /// Message to surface alongside the result, if any.
    /// A partial photo failure stays quiet; only losing every photo is worth a notice.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            SubmissionOutcome::Submitted { .. } => None,
            SubmissionOutcome::SubmittedWithSkippedImages { attached: 0, .. } => Some(IMAGES_NOT_ATTACHED_MESSAGE),
            SubmissionOutcome::SubmittedWithSkippedImages { .. } => None,
            SubmissionOutcome::Failed { .. } => Some(SUBMISSION_FAILED_MESSAGE),
        }
    }
}

#[async_trait]
pub trait LeadService: Send + Sync {
    /// Upload `images`, compose the lead and store it. The draft must already be valid.
    async fn submit_lead(
        &self,
        contact: &ContactDetails,
        details: &ServiceDetails,
        images: &[StagedImage],
    ) -> SubmissionOutcome;
}

pub struct LeadServiceImpl {
    pub lead_repo: Arc<dyn LeadRepository>,
    pub uploader: Arc<dyn ImageUploader>,
    pub upload_timeout: Duration,
    pub create_timeout: Duration,
}

impl LeadServiceImpl {
    pub fn new(
        lead_repo: Arc<dyn LeadRepository>,
        uploader: Arc<dyn ImageUploader>,
        config: &EstimateConfig,
    ) -> Self {
        LeadServiceImpl {
            lead_repo,
            uploader,
            upload_timeout: config.upload_timeout,
            create_timeout: config.create_timeout,
        }
    }

    /// Upload one at a time. A failure or timeout skips that photo and moves on.
    /// Returns the URLs that made it and the number skipped.
    async fn upload_images(&self, images: &[StagedImage]) -> (Vec<String>, usize) {
        let mut urls = Vec::with_capacity(images.len());
        let mut skipped = 0;

        for image in images {
            match tokio::time::timeout(self.upload_timeout, self.uploader.upload(image)).await {
                Ok(Ok(url)) => urls.push(url),
                Ok(Err(e)) => {
                    warn!(file_name = %image.file_name, "Image upload failed, skipping: {e}");
                    skipped += 1;
                }
                Err(_) => {
                    warn!(
                        file_name = %image.file_name,
                        timeout_secs = self.upload_timeout.as_secs(),
                        "Image upload timed out, skipping"
                    );
                    skipped += 1;
                }
            }
        }

        (urls, skipped)
    }

    async fn store(&self, lead: Lead) -> Result<Lead, ServiceError> {
        match tokio::time::timeout(self.create_timeout, self.lead_repo.create(lead)).await {
            Ok(res) => res.map_err(ServiceError::from),
            Err(_) => Err(ServiceError::Timeout(format!(
                "lead insert did not finish within {}s",
                self.create_timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl LeadService for LeadServiceImpl {
    #[instrument(
        skip(self, contact, details, images),
        fields(service_type = %details.category(), images = images.len())
    )]
    async fn submit_lead(
        &self,
        contact: &ContactDetails,
        details: &ServiceDetails,
        images: &[StagedImage],
    ) -> SubmissionOutcome {
        info!("Submitting lead");

        let (urls, skipped) = self.upload_images(images).await;
        let attached = urls.len();
        if skipped > 0 {
            warn!(attached, skipped, "Some images were not attached");
        }

        let lead = Lead::compose(contact, details, urls);

        match self.store(lead).await {
            Ok(lead) if skipped == 0 => {
                info!(attached, "Lead submitted");
                SubmissionOutcome::Submitted { lead }
            }
            Ok(lead) => {
                info!(attached, skipped, "Lead submitted without some images");
                SubmissionOutcome::SubmittedWithSkippedImages { lead, attached, skipped }
            }
            Err(e) => {
                error!("Failed to store lead: {e}");
                SubmissionOutcome::Failed { reason: e.to_string() }
            }
        }
    }
}
