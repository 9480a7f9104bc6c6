use axum::{extract::{Multipart, State}, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::EstimateConfig;
use crate::dto::lead_dto::{EstimateOptionsDto, EstimateRequest, LeadResponseDto};
use crate::form::{FormController, StagedImage, SubmitError};
use crate::service::lead_service::{LeadService, SubmissionOutcome, SUBMISSION_FAILED_MESSAGE};
use crate::util::error::{HandlerError, HandlerErrorKind};

/// Shared state behind the estimate routes
pub struct EstimateState {
    pub lead_service: Arc<dyn LeadService>,
    pub config: EstimateConfig,
}

/// Parts of one estimate POST, before they are replayed through a form session
struct EstimateUpload {
    request: EstimateRequest,
    images: Vec<StagedImage>,
}

async fn read_multipart(mut multipart: Multipart) -> Result<EstimateUpload, HandlerError> {
    let mut request: Option<EstimateRequest> = None;
    let mut images = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("[create_lead_handler] Error getting next field: {}", e);
        HandlerError::bad_request(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().map(str::to_string).unwrap_or_default();

        if name == "json" {
            let data = field.bytes().await.map_err(|e| {
                HandlerError::bad_request(format!("Failed to read json field: {}", e))
            })?;
            let parsed = serde_json::from_slice(&data).map_err(|e| {
                warn!("[create_lead_handler] Invalid JSON: {}", e);
                HandlerError::bad_request(format!("Invalid JSON: {}", e))
            })?;
            request = Some(parsed);
        } else if name.starts_with("file") || name.starts_with("image") {
            let file_name = field.file_name().map(str::to_string).unwrap_or_else(|| name.clone());
            let content_type = field
                .content_type()
                .map(str::to_string)
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let content = field.bytes().await.map_err(|e| {
                error!("[create_lead_handler] Error reading file {}: {}", file_name, e);
                HandlerError::bad_request(format!("Failed to read file {}: {}", file_name, e))
            })?;
            debug!("[create_lead_handler] Received file: {} ({} bytes)", file_name, content.len());
            images.push(StagedImage::new(file_name, content_type, content));
        } else {
            debug!("[create_lead_handler] Ignoring field: {}", name);
        }
    }

    let request = request.ok_or_else(|| HandlerError::bad_request("Missing estimate JSON data"))?;
    Ok(EstimateUpload { request, images })
}

/// POST /api/leads
///
/// Multipart body: a `json` part with the flat form values and any number of
/// `file*`/`image*` parts with photos.
pub async fn create_lead_handler(
    State(state): State<Arc<EstimateState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    info!("[create_lead_handler] Handler called");
    let EstimateUpload { request, images } = read_multipart(multipart).await?;

    let mut form = FormController::new(&state.config);
    form.edit_contact(|contact| *contact = request.contact());

    let category = request
        .category()
        .map_err(|e| HandlerError::bad_request(e.to_string()))?;
    if let Some(category) = category {
        let details = request
            .details(category)
            .map_err(|e| HandlerError::bad_request(format!("Invalid {} fields: {}", category, e)))?;
        form.select_category(category);
        form.edit_details(|current| *current = details);
    }

    let mut notices: Vec<String> = form
        .stage_images(images)
        .iter()
        .map(ToString::to_string)
        .collect();

    let outcome = form
        .submit(state.lead_service.as_ref())
        .await
        .map_err(|e| match e {
            SubmitError::Invalid(errors) => HandlerError {
                error: HandlerErrorKind::Validation,
                message: "Please fix the highlighted fields".to_string(),
                details: serde_json::to_value(&errors).ok(),
            },
            other => HandlerError::bad_request(other.to_string()),
        })?;

    if let SubmissionOutcome::Failed { reason } = &outcome {
        error!("[create_lead_handler] Lead submission failed: {}", reason);
        return Err(HandlerError {
            error: HandlerErrorKind::Upstream,
            message: SUBMISSION_FAILED_MESSAGE.to_string(),
            details: None,
        });
    }

    if let Some(notice) = outcome.notice() {
        notices.push(notice.to_string());
    }

    Ok((StatusCode::CREATED, Json(LeadResponseDto { outcome, notices })))
}

/// GET /api/estimate/options
pub async fn estimate_options_handler(State(state): State<Arc<EstimateState>>) -> impl IntoResponse {
    Json(EstimateOptionsDto::new(&state.config))
}
