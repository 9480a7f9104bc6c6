//! Field rules for the estimate form.
//!
//! The declarative rules live as `validator` attributes on the typed field
//! structs in [`crate::model::service_details`]; this module holds the custom
//! checks those attributes call and folds the results into [`FieldErrors`].

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::model::service_details::{ContactDetails, ServiceDetails, JUNK_TYPES};

/// Per-field messages keyed by the wire (camelCase) field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    fn absorb(&mut self, errors: ValidationErrors) {
        for (field, errs) in errors.field_errors() {
            if let Some(first) = errs.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", first.code));
                self.insert(camel_case(field), message);
            }
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Check a draft against the shared rules and the rules of its category.
/// `None` details means no category has been picked yet.
pub fn validate_draft(contact: &ContactDetails, details: Option<&ServiceDetails>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if let Err(e) = contact.validate() {
        errors.absorb(e);
    }

    match details {
        Some(details) => {
            if let Err(e) = details.validate() {
                errors.absorb(e);
            }
        }
        None => errors.insert("serviceType", "Please select a service"),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// At least one checklist item must be ticked; blank entries are ignored.
pub fn validate_junk_types(items: &[String]) -> Result<(), ValidationError> {
    let selected: Vec<&str> = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect();

    if selected.is_empty() {
        return Err(error_with_message("junk_types_required", "Please select at least one junk type"));
    }

    if let Some(unknown) = selected.iter().find(|item| !JUNK_TYPES.contains(item)) {
        return Err(error_with_message(
            "junk_types_unknown",
            format!("Unknown junk type: {}", unknown),
        ));
    }

    Ok(())
}

/// Today is the calendar date in the server's local time zone, which is the
/// zone the business books jobs in. Today itself is accepted.
pub fn validate_not_in_past(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date < Local::now().date_naive() {
        return Err(ValidationError::new("date_in_past"));
    }
    Ok(())
}

fn error_with_message(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
