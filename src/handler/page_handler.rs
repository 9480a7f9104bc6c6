use axum::{extract::Path, response::IntoResponse, Json};

use crate::model::page::{find_page, PAGES};
use crate::util::error::HandlerError;

/// GET /api/pages
pub async fn list_pages_handler() -> impl IntoResponse {
    Json(PAGES)
}

/// GET /api/pages/{*path}
pub async fn get_page_handler(Path(path): Path<String>) -> Result<impl IntoResponse, HandlerError> {
    let path = format!("/{}", path.trim_start_matches('/'));
    find_page(&path)
        .map(Json)
        .ok_or_else(|| HandlerError::not_found(format!("No page at {}", path)))
}

/// Catch-all for unknown routes
pub async fn not_found_handler() -> HandlerError {
    HandlerError::not_found("Page not found")
}
