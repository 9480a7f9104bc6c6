use axum::{routing::get, Router};

use crate::handler::page_handler::{get_page_handler, list_pages_handler, not_found_handler};

pub fn page_router() -> Router {
    Router::new()
        .route("/api/pages", get(list_pages_handler))
        .route("/api/pages/{*path}", get(get_page_handler))
        .route("/health", get(|| async { "OK" }))
        .fallback(not_found_handler)
}
