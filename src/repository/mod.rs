pub mod lead_repo;
pub mod repository_error;
