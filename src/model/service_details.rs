use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationErrors};

use crate::form::validation::{validate_junk_types, validate_not_in_past};

/// Fixed checklist offered for junk removal jobs.
pub const JUNK_TYPES: [&str; 8] = [
    "Furniture",
    "Appliances",
    "Electronics",
    "Mattresses",
    "Construction Debris",
    "Yard Waste",
    "General Household",
    "Office Items",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceCategory {
    #[serde(rename = "Moving")]
    Moving,
    #[serde(rename = "Junk Removal")]
    JunkRemoval,
    #[serde(rename = "Furniture Delivery")]
    FurnitureDelivery,
    #[serde(rename = "Custom Hauling")]
    CustomHauling,
}

impl ServiceCategory {
    /// Picker order
    pub const ALL: [ServiceCategory; 4] = [
        ServiceCategory::Moving,
        ServiceCategory::JunkRemoval,
        ServiceCategory::FurnitureDelivery,
        ServiceCategory::CustomHauling,
    ];

    /// Label stored as the lead's `service_type`
    pub fn label(&self) -> &'static str {
        match self {
            ServiceCategory::Moving => "Moving",
            ServiceCategory::JunkRemoval => "Junk Removal",
            ServiceCategory::FurnitureDelivery => "Furniture Delivery",
            ServiceCategory::CustomHauling => "Custom Hauling",
        }
    }

    pub fn tagline(&self) -> &'static str {
        match self {
            ServiceCategory::Moving => "Local & long-distance moving services",
            ServiceCategory::JunkRemoval => "Furniture & household junk removal",
            ServiceCategory::FurnitureDelivery => "Store pickup & delivery services",
            ServiceCategory::CustomHauling => "Specialized hauling & transport",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown service type: {0}")]
pub struct UnknownServiceCategory(pub String);

impl FromStr for ServiceCategory {
    type Err = UnknownServiceCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceCategory::ALL
            .into_iter()
            .find(|c| c.label() == s.trim())
            .ok_or_else(|| UnknownServiceCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HomeType {
    #[serde(rename = "studio")]
    Studio,
    #[serde(rename = "1bed")]
    OneBedroom,
    #[serde(rename = "2bed")]
    TwoBedroom,
    #[serde(rename = "3bed")]
    ThreeBedroom,
    #[serde(rename = "4bed")]
    FourPlusBedroom,
    #[serde(rename = "house")]
    House,
    #[serde(rename = "condo")]
    Condo,
}

impl HomeType {
    pub const ALL: [HomeType; 7] = [
        HomeType::Studio,
        HomeType::OneBedroom,
        HomeType::TwoBedroom,
        HomeType::ThreeBedroom,
        HomeType::FourPlusBedroom,
        HomeType::House,
        HomeType::Condo,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            HomeType::Studio => "Studio",
            HomeType::OneBedroom => "1 Bedroom",
            HomeType::TwoBedroom => "2 Bedroom",
            HomeType::ThreeBedroom => "3 Bedroom",
            HomeType::FourPlusBedroom => "4+ Bedroom",
            HomeType::House => "House",
            HomeType::Condo => "Condo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Furniture,
    Appliances,
    Electronics,
    Mattress,
    Multiple,
    Other,
}

impl ItemType {
    pub const ALL: [ItemType; 6] = [
        ItemType::Furniture,
        ItemType::Appliances,
        ItemType::Electronics,
        ItemType::Mattress,
        ItemType::Multiple,
        ItemType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ItemType::Furniture => "Furniture",
            ItemType::Appliances => "Appliances",
            ItemType::Electronics => "Electronics",
            ItemType::Mattress => "Mattress/Bedding",
            ItemType::Multiple => "Multiple Items",
            ItemType::Other => "Other",
        }
    }
}

/// An untouched picker or date input posts `""`; read it, and `null`, as not chosen.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => serde_json::from_value(value).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Fields every category shares.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContactDetails {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 10, message = "Please enter a valid phone number"))]
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct MovingDetails {
    #[validate(length(min = 5, message = "Please enter pickup address"))]
    pub from_address: String,
    #[validate(length(min = 5, message = "Please enter delivery address"))]
    pub to_address: String,
    #[validate(required(message = "Please select home type"))]
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub home_type: Option<HomeType>,
    #[validate(required(message = "Please select elevator access"))]
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub elevator_access: Option<YesNo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heavy_items: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct JunkRemovalDetails {
    #[validate(length(min = 5, message = "Please enter your address"))]
    pub address: String,
    #[validate(custom(function = "validate_junk_types"))]
    pub junk_types: Vec<String>,
    #[validate(required(message = "Please select stairs access"))]
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub stairs_access: Option<YesNo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct FurnitureDeliveryDetails {
    #[validate(length(min = 2, message = "Please enter store name"))]
    pub store_name: String,
    #[validate(length(min = 5, message = "Please enter pickup address"))]
    pub pickup_address: String,
    #[validate(length(min = 5, message = "Please enter delivery address"))]
    pub delivery_address: String,
    #[validate(required(message = "Please select item type"))]
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    #[validate(custom(function = "validate_not_in_past", message = "Delivery date cannot be in the past"))]
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomHaulingDetails {
    #[validate(length(min = 5, message = "Please enter your address"))]
    pub address: String,
    #[validate(length(min = 10, message = "Please describe what needs to be hauled"))]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_details: Option<String>,
}

/// Category-specific half of a lead draft. The variant is the category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServiceDetails {
    Moving(MovingDetails),
    JunkRemoval(JunkRemovalDetails),
    FurnitureDelivery(FurnitureDeliveryDetails),
    CustomHauling(CustomHaulingDetails),
}

impl ServiceDetails {
    /// Blank field set for a freshly selected category
    pub fn empty(category: ServiceCategory) -> Self {
        match category {
            ServiceCategory::Moving => ServiceDetails::Moving(MovingDetails::default()),
            ServiceCategory::JunkRemoval => ServiceDetails::JunkRemoval(JunkRemovalDetails::default()),
            ServiceCategory::FurnitureDelivery => {
                ServiceDetails::FurnitureDelivery(FurnitureDeliveryDetails::default())
            }
            ServiceCategory::CustomHauling => ServiceDetails::CustomHauling(CustomHaulingDetails::default()),
        }
    }

    pub fn category(&self) -> ServiceCategory {
        match self {
            ServiceDetails::Moving(_) => ServiceCategory::Moving,
            ServiceDetails::JunkRemoval(_) => ServiceCategory::JunkRemoval,
            ServiceDetails::FurnitureDelivery(_) => ServiceCategory::FurnitureDelivery,
            ServiceDetails::CustomHauling(_) => ServiceCategory::CustomHauling,
        }
    }

    /// Read the fields of `category` out of a flat JSON object.
    /// Keys that belong to other categories, or to the contact set, are ignored.
    pub fn from_fields(category: ServiceCategory, fields: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match category {
            ServiceCategory::Moving => ServiceDetails::Moving(serde_json::from_value(fields)?),
            ServiceCategory::JunkRemoval => ServiceDetails::JunkRemoval(serde_json::from_value(fields)?),
            ServiceCategory::FurnitureDelivery => {
                ServiceDetails::FurnitureDelivery(serde_json::from_value(fields)?)
            }
            ServiceCategory::CustomHauling => ServiceDetails::CustomHauling(serde_json::from_value(fields)?),
        })
    }

    /// Copy ready for storage: blank junk checklist entries are dropped.
    pub fn cleaned(&self) -> Self {
        match self {
            ServiceDetails::JunkRemoval(details) => {
                let mut details = details.clone();
                details.junk_types.retain(|item| !item.trim().is_empty());
                ServiceDetails::JunkRemoval(details)
            }
            other => other.clone(),
        }
    }
}

impl Validate for ServiceDetails {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            ServiceDetails::Moving(d) => d.validate(),
            ServiceDetails::JunkRemoval(d) => d.validate(),
            ServiceDetails::FurnitureDelivery(d) => d.validate(),
            ServiceDetails::CustomHauling(d) => d.validate(),
        }
    }
}
