use bson::oid::ObjectId;
use serde::Serialize;

use crate::model::service_details::{ContactDetails, ServiceDetails};

/// Nested `form_data` payload of a lead: the category fields plus photo links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormData {
    #[serde(flatten)]
    pub details: ServiceDetails,
    /// Absent, never empty, when no photo made it to storage
    #[serde(rename = "imageUrls", skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
}

/// Outbound record for the `leads` table. Immutable once sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lead {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_type: String,
    pub form_data: FormData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Lead {
    /// Shape a validated draft and the uploaded photo URLs into a lead.
    pub fn compose(contact: &ContactDetails, details: &ServiceDetails, image_urls: Vec<String>) -> Self {
        Lead {
            id: None,
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            service_type: details.category().label().to_string(),
            form_data: FormData {
                details: details.cleaned(),
                image_urls: if image_urls.is_empty() { None } else { Some(image_urls) },
            },
            created_at: None,
        }
    }

    pub fn image_count(&self) -> usize {
        self.form_data.image_urls.as_ref().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::service_details::CustomHaulingDetails;
    use serde_json::json;

    fn contact() -> ContactDetails {
        ContactDetails {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "4165550123".to_string(),
        }
    }

    fn hauling() -> ServiceDetails {
        ServiceDetails::CustomHauling(CustomHaulingDetails {
            address: "123 Main St, Toronto, ON".to_string(),
            description: "old couch and 3 boxes, heavy".to_string(),
            additional_details: None,
        })
    }

    #[test]
    fn test_compose_without_images_omits_key() {
        let lead = Lead::compose(&contact(), &hauling(), Vec::new());
        let value = serde_json::to_value(&lead).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "phone": "4165550123",
                "service_type": "Custom Hauling",
                "form_data": {
                    "address": "123 Main St, Toronto, ON",
                    "description": "old couch and 3 boxes, heavy"
                }
            })
        );
        assert_eq!(lead.image_count(), 0);
    }

    #[test]
    fn test_compose_with_images() {
        let urls = vec!["https://cdn.example/a.jpg".to_string()];
        let lead = Lead::compose(&contact(), &hauling(), urls.clone());
        let value = serde_json::to_value(&lead).unwrap();
        assert_eq!(value["form_data"]["imageUrls"], json!(urls));
        assert_eq!(lead.image_count(), 1);
    }

    #[test]
    fn test_payload_never_carries_contact_fields() {
        let lead = Lead::compose(&contact(), &hauling(), Vec::new());
        let value = serde_json::to_value(&lead.form_data).unwrap();
        for key in ["name", "email", "phone", "serviceType"] {
            assert!(value.get(key).is_none(), "{key} leaked into form_data");
        }
    }
}
