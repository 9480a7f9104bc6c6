use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::EstimateConfig;
use crate::model::service_details::{
    ContactDetails, HomeType, ItemType, ServiceCategory, ServiceDetails, UnknownServiceCategory, JUNK_TYPES,
};
use crate::service::lead_service::SubmissionOutcome;

/// Flat form values posted in the `json` part of an estimate request.
///
/// Contact fields and `serviceType` are named; everything else is collected
/// and later read through the selected category's field set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EstimateRequest {
    pub fn contact(&self) -> ContactDetails {
        ContactDetails {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }

    /// `None` when the picker was left empty
    pub fn category(&self) -> Result<Option<ServiceCategory>, UnknownServiceCategory> {
        match self.service_type.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(label) => label.parse().map(Some),
        }
    }

    pub fn details(&self, category: ServiceCategory) -> Result<ServiceDetails, serde_json::Error> {
        ServiceDetails::from_fields(category, Value::Object(self.fields.clone()))
    }
}

#[derive(Debug, Serialize)]
pub struct LeadResponseDto {
    #[serde(flatten)]
    pub outcome: SubmissionOutcome,
    pub notices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ChoiceDto {
    pub value: serde_json::Value,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CategoryDto {
    pub value: ServiceCategory,
    pub tagline: &'static str,
}

/// Everything the category picker and the choice fields need to render.
#[derive(Debug, Serialize)]
pub struct EstimateOptionsDto {
    pub categories: Vec<CategoryDto>,
    pub home_types: Vec<ChoiceDto>,
    pub item_types: Vec<ChoiceDto>,
    pub junk_types: Vec<&'static str>,
    pub max_images: usize,
    pub max_image_bytes: usize,
}

impl EstimateOptionsDto {
    pub fn new(config: &EstimateConfig) -> Self {
        EstimateOptionsDto {
            categories: ServiceCategory::ALL
                .into_iter()
                .map(|value| CategoryDto { value, tagline: value.tagline() })
                .collect(),
            home_types: HomeType::ALL
                .into_iter()
                .map(|h| ChoiceDto { value: serde_json::json!(h), label: h.label() })
                .collect(),
            item_types: ItemType::ALL
                .into_iter()
                .map(|i| ChoiceDto { value: serde_json::json!(i), label: i.label() })
                .collect(),
            junk_types: JUNK_TYPES.to_vec(),
            max_images: config.max_images,
            max_image_bytes: config.max_image_bytes,
        }
    }
}
