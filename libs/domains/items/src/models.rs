use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::serialize_object_id_as_hex_string;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

/// Lifecycle flag carried by every catalog document
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

/// Catalog item (a crop product or service)
///
/// `lname` is the lowercase transform of `name`, maintained by the write
/// path for case-insensitive search; it is never settable by callers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String)]
    pub id: ObjectId,
    pub name: String,
    pub lname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub record_status: RecordStatus,
}

/// A variant of an item, addressed by (itemId, variantId)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String)]
    pub id: ObjectId,
    pub name: String,
    pub lname: String,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String)]
    pub item_id: ObjectId,
    /// Resolved item, present only in populated views
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub record_status: RecordStatus,
}

/// Payload for creating an item
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

/// Partial update for an item; renaming also refreshes `lname`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub record_status: Option<RecordStatus>,
}

/// Payload for creating a variant under an item
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariant {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

/// Partial update for a variant; renaming also refreshes `lname`
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVariant {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub record_status: Option<RecordStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document};

    #[test]
    fn test_item_serializes_hex_id_and_camel_case() {
        let id = ObjectId::new();
        let now = Utc::now();
        let item = Item {
            id,
            name: "Tomato".to_string(),
            lname: "tomato".to_string(),
            created_at: now,
            updated_at: now,
            record_status: RecordStatus::Active,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["_id"], serde_json::json!(id.to_hex()));
        assert_eq!(json["lname"], serde_json::json!("tomato"));
        assert_eq!(json["recordStatus"], serde_json::json!("active"));
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_variant_without_item_omits_the_field() {
        let now = Utc::now();
        let variant = Variant {
            id: ObjectId::new(),
            name: "Roma".to_string(),
            lname: "roma".to_string(),
            item_id: ObjectId::new(),
            item: None,
            created_at: now,
            updated_at: now,
            record_status: RecordStatus::Active,
        };

        let json = serde_json::to_value(&variant).unwrap();
        assert!(json.get("item").is_none());
    }

    #[test]
    fn test_variant_decodes_from_stored_document() {
        let item_id = ObjectId::new();
        let document = doc! {
            "_id": ObjectId::new(),
            "name": "Roma",
            "lname": "roma",
            "itemId": item_id,
            "createdAt": "2024-05-01T12:00:00Z",
            "updatedAt": "2024-05-01T12:00:00Z",
            "recordStatus": "active",
        };

        let variant: Variant = from_document(document).unwrap();
        assert_eq!(variant.item_id, item_id);
        assert!(variant.item.is_none());
    }

    #[test]
    fn test_item_decode_fails_without_record_status() {
        let document = doc! {
            "_id": ObjectId::new(),
            "name": "Tomato",
            "lname": "tomato",
            "createdAt": "2024-05-01T12:00:00Z",
            "updatedAt": "2024-05-01T12:00:00Z",
        };

        assert!(from_document::<Item>(document).is_err());
    }

    #[test]
    fn test_update_item_defaults_to_all_absent() {
        let input: UpdateItem = serde_json::from_str("{}").unwrap();
        assert!(input.name.is_none());
        assert!(input.record_status.is_none());
    }
}
