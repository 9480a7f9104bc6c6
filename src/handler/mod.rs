pub mod lead_handler;
pub mod page_handler;
