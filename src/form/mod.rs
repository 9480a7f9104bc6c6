//! The estimate form: field rules, photo staging and the per-session controller.

pub mod controller;
pub mod staging;
pub mod validation;

pub use controller::{FormController, SubmissionState, SubmitError};
pub use staging::{ImageStaging, StageOutcome, StagedImage, StagingNotice};
pub use validation::FieldErrors;
