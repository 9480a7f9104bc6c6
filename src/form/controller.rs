use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::EstimateConfig;
use crate::form::staging::{ImageStaging, StageOutcome, StagedImage, StagingNotice};
use crate::form::validation::{validate_draft, FieldErrors};
use crate::model::service_details::{ContactDetails, ServiceCategory, ServiceDetails};
use crate::service::lead_service::{LeadService, SubmissionOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    #[error("Please fix the highlighted fields: {0}")]
    Invalid(FieldErrors),

    #[error("A submission is already in progress")]
    InFlight,

    #[error("This request has already been submitted")]
    AlreadySubmitted,
}

/// One estimate form session: the selected category, the draft, and the staged photos.
///
/// Field errors are recomputed after every edit so they can be shown as the
/// user types. Only one submission runs at a time; a successful one resets the
/// session, a failed one leaves everything in place for a retry.
#[derive(Debug)]
pub struct FormController {
    contact: ContactDetails,
    details: Option<ServiceDetails>,
    images: ImageStaging,
    errors: FieldErrors,
    state: SubmissionState,
}

impl FormController {
    pub fn new(config: &EstimateConfig) -> Self {
        let mut controller = FormController {
            contact: ContactDetails::default(),
            details: None,
            images: ImageStaging::new(config.max_image_bytes, config.max_images),
            errors: FieldErrors::default(),
            state: SubmissionState::Idle,
        };
        controller.revalidate();
        controller
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// The submit control is disabled while a request is in flight and after success
    pub fn can_submit(&self) -> bool {
        matches!(self.state, SubmissionState::Idle | SubmissionState::Failed)
    }

    pub fn category(&self) -> Option<ServiceCategory> {
        self.details.as_ref().map(ServiceDetails::category)
    }

    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    pub fn details(&self) -> Option<&ServiceDetails> {
        self.details.as_ref()
    }

    pub fn images(&self) -> &ImageStaging {
        &self.images
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    /// Switch to `category` with a blank field set. Contact details are kept.
    pub fn select_category(&mut self, category: ServiceCategory) -> &FieldErrors {
        debug!(%category, previous = ?self.category(), "Category selected");
        self.details = Some(ServiceDetails::empty(category));
        self.revalidate()
    }

    /// Back to the category picker without losing the contact details
    pub fn clear_category(&mut self) -> Result<(), SubmitError> {
        if self.state == SubmissionState::Submitting {
            return Err(SubmitError::InFlight);
        }
        self.details = None;
        self.revalidate();
        Ok(())
    }

    pub fn edit_contact<F>(&mut self, edit: F) -> &FieldErrors
    where
        F: FnOnce(&mut ContactDetails),
    {
        edit(&mut self.contact);
        self.revalidate()
    }

    /// Edit the category fields. Returns `None` when no category is selected.
    pub fn edit_details<F>(&mut self, edit: F) -> Option<&FieldErrors>
    where
        F: FnOnce(&mut ServiceDetails),
    {
        edit(self.details.as_mut()?);
        Some(self.revalidate())
    }

    pub fn stage_image(&mut self, image: StagedImage) -> Result<StageOutcome, StagingNotice> {
        self.images.stage(image)
    }

    pub fn stage_images<I>(&mut self, images: I) -> Vec<StagingNotice>
    where
        I: IntoIterator<Item = StagedImage>,
    {
        self.images.stage_all(images)
    }

    pub fn unstage_image(&mut self, index: usize) -> Option<StagedImage> {
        self.images.unstage(index)
    }

    /// Validate, then hand the draft and photos to `service`.
    ///
    /// A validation failure never reaches the service. On success the session
    /// is cleared; on failure the draft and photos are left untouched.
    pub async fn submit(&mut self, service: &dyn LeadService) -> Result<SubmissionOutcome, SubmitError> {
        match self.state {
            SubmissionState::Submitting => return Err(SubmitError::InFlight),
            SubmissionState::Succeeded => return Err(SubmitError::AlreadySubmitted),
            SubmissionState::Idle | SubmissionState::Failed => {}
        }

        self.revalidate();
        let details = match self.details.as_ref() {
            Some(details) if self.errors.is_empty() => details,
            _ => {
                debug!(fields = %self.errors, "Submission blocked by validation");
                return Err(SubmitError::Invalid(self.errors.clone()));
            }
        };

        self.state = SubmissionState::Submitting;
        let in_flight = InFlight::new(&mut self.state);
        let outcome = service
            .submit_lead(&self.contact, details, self.images.images())
            .await;
        in_flight.settle();

        if outcome.is_success() {
            info!("Submission succeeded, resetting form");
            self.images.clear();
            self.contact = ContactDetails::default();
            self.details = None;
            self.errors = FieldErrors::default();
            self.state = SubmissionState::Succeeded;
        } else {
            warn!("Submission failed, keeping draft for retry");
            self.state = SubmissionState::Failed;
        }

        Ok(outcome)
    }

    /// Leave the confirmation and start a fresh request
    pub fn start_another(&mut self) {
        if self.state == SubmissionState::Succeeded {
            self.state = SubmissionState::Idle;
            self.revalidate();
        }
    }

    fn revalidate(&mut self) -> &FieldErrors {
        self.errors = match validate_draft(&self.contact, self.details.as_ref()) {
            Ok(()) => FieldErrors::default(),
            Err(errors) => errors,
        };
        &self.errors
    }
}

/// Holds the session in `Submitting` for the duration of one attempt.
/// Dropped before `settle`, the attempt was abandoned and the form goes back to `Failed`.
struct InFlight<'a> {
    state: &'a mut SubmissionState,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a mut SubmissionState) -> Self {
        InFlight { state, settled: false }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled && *self.state == SubmissionState::Submitting {
            warn!("Submission abandoned mid-flight, form can be resubmitted");
            *self.state = SubmissionState::Failed;
        }
    }
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(&EstimateConfig::default())
    }
}
