pub mod lead_service;
pub mod upload_service;
