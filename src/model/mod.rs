pub mod lead;
pub mod page;
pub mod service_details;
