pub mod lead_router;
pub mod page_router;
