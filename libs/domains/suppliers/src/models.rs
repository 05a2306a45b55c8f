//! Supplier domain models and DTOs

use chrono::{DateTime, Utc};
use domain_crops::Crop;
use domain_geo::City;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

/// Lifecycle marker for supplier records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

/// A supplier in its populated form: the city reference resolved and
/// the crops owned by the supplier joined in, each with its variant and
/// item. Raw reference ids never appear in this view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(
        rename = "_id",
        serialize_with = "mongodb::bson::serde_helpers::serialize_object_id_as_hex_string"
    )]
    #[schema(value_type = String)]
    pub id: ObjectId,
    pub name: String,
    pub surname: String,
    pub document_type: String,
    pub document_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<City>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub crops: Vec<Crop>,
    pub record_status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a supplier
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplier {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 120))]
    pub surname: String,
    #[validate(length(min = 1, max = 40))]
    pub document_type: String,
    #[validate(length(min = 1, max = 40))]
    pub document_number: String,
    /// Hex id of the supplier's city
    #[validate(length(equal = 24))]
    pub city_id: String,
    #[validate(email)]
    pub email: Option<String>,
    pub address_line1: Option<String>,
    pub phone_number: Option<String>,
}

/// Partial update for a supplier; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupplier {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub surname: Option<String>,
    #[validate(length(min = 1, max = 40))]
    pub document_type: Option<String>,
    #[validate(length(min = 1, max = 40))]
    pub document_number: Option<String>,
    #[validate(length(equal = 24))]
    pub city_id: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address_line1: Option<String>,
    pub phone_number: Option<String>,
    pub record_status: Option<RecordStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document};

    #[test]
    fn test_supplier_serializes_id_as_hex() {
        let id = ObjectId::new();
        let now = Utc::now();
        let supplier = Supplier {
            id,
            name: "Maria".to_string(),
            surname: "Gomez".to_string(),
            document_type: "CC".to_string(),
            document_number: "1017245".to_string(),
            city: None,
            email: None,
            address_line1: None,
            phone_number: None,
            crops: vec![],
            record_status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&supplier).unwrap();
        assert_eq!(json["_id"], serde_json::json!(id.to_hex()));
        assert_eq!(json["recordStatus"], serde_json::json!("active"));
        assert!(json.get("city").is_none());
    }

    #[test]
    fn test_supplier_decodes_without_crops_field() {
        let document = doc! {
            "_id": ObjectId::new(),
            "name": "Maria",
            "surname": "Gomez",
            "documentType": "CC",
            "documentNumber": "1017245",
            "recordStatus": "active",
            "createdAt": Utc::now().to_rfc3339(),
            "updatedAt": Utc::now().to_rfc3339(),
        };

        let supplier: Supplier = from_document(document).unwrap();
        assert!(supplier.crops.is_empty());
    }

    #[test]
    fn test_supplier_decodes_crop_stored_without_variant() {
        // One crop in the joined array never had a variant reference;
        // the owner view must still decode with that crop intact.
        let document = doc! {
            "_id": ObjectId::new(),
            "name": "Maria",
            "surname": "Gomez",
            "documentType": "CC",
            "documentNumber": "1017245",
            "recordStatus": "active",
            "crops": [{
                "_id": ObjectId::new(),
                "cityId": ObjectId::new(),
                "supplierId": ObjectId::new(),
                "plantingDate": "2024-03-01T00:00:00Z",
                "harvestDate": "2024-08-01T00:00:00Z",
                "variant": {},
                "createdAt": "2024-02-01T00:00:00Z",
                "updatedAt": "2024-02-01T00:00:00Z",
            }],
            "createdAt": Utc::now().to_rfc3339(),
            "updatedAt": Utc::now().to_rfc3339(),
        };

        let supplier: Supplier = from_document(document).unwrap();
        assert_eq!(supplier.crops.len(), 1);
        assert!(supplier.crops[0].variant.is_none());
    }

    #[test]
    fn test_create_supplier_rejects_short_city_reference() {
        let input = CreateSupplier {
            name: "Maria".to_string(),
            surname: "Gomez".to_string(),
            document_type: "CC".to_string(),
            document_number: "1017245".to_string(),
            city_id: "abc".to_string(),
            email: None,
            address_line1: None,
            phone_number: None,
        };

        assert!(input.validate().is_err());
    }

    #[test]
    fn test_update_supplier_deserializes_partial_payload() {
        let input: UpdateSupplier =
            serde_json::from_str(r#"{"phoneNumber": "3015550134"}"#).unwrap();

        assert_eq!(input.phone_number.as_deref(), Some("3015550134"));
        assert!(input.name.is_none());
        assert!(input.record_status.is_none());
    }
}
