use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};
use std::sync::Arc;

use crate::handler::lead_handler::{create_lead_handler, estimate_options_handler, EstimateState};

/// Headroom for oversized photos, which must still arrive to be rejected with a notice
fn body_limit(state: &EstimateState) -> usize {
    state
        .config
        .max_image_bytes
        .saturating_mul(state.config.max_images.saturating_mul(2))
        .saturating_add(1024 * 1024)
}

pub fn lead_router(state: Arc<EstimateState>) -> Router {
    let limit = body_limit(&state);
    Router::new()
        .route("/api/leads", post(create_lead_handler))
        .route("/api/estimate/options", get(estimate_options_handler))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}
