use chrono::{DateTime, Utc};
use domain_geo::City;
use domain_items::Variant;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::serialize_object_id_as_hex_string;
use mongodb::bson::Document;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;
use validator::Validate;

/// Serialize an optional ObjectId reference as its hex string
pub(crate) fn serialize_opt_object_id_as_hex_string<S>(
    value: &Option<ObjectId>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(oid) => serializer.serialize_str(&oid.to_hex()),
        None => serializer.serialize_none(),
    }
}

/// Decode the variant joined into a populated view, treating an empty
/// sub-document the same as an absent one
///
/// A preserving unwind that runs after a nested lookup can leave the
/// intermediate path behind as `{}` when the variant reference was
/// never set; that shape must read back as no variant at all.
pub(crate) fn deserialize_joined_variant<'de, D>(
    deserializer: D,
) -> Result<Option<Variant>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Document>::deserialize(deserializer)? {
        None => Ok(None),
        Some(document) if document.is_empty() => Ok(None),
        Some(document) => mongodb::bson::from_document(document)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Summary of the owner joined into a populated crop view
///
/// Decoded from the owning supplier document; the password hash of a
/// user owner has no field here and can never leak through this view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CropOwner {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String)]
    pub id: ObjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Crop document; reference fields are populated into nested objects by
/// the aggregation read path, which also projects the raw ids away
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String)]
    pub id: ObjectId,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_object_id_as_hex_string"
    )]
    #[schema(value_type = Option<String>)]
    pub city_id: Option<ObjectId>,
    /// Resolved city; absent when the reference is missing or dangling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<City>,
    pub planting_date: DateTime<Utc>,
    pub harvest_date: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_object_id_as_hex_string"
    )]
    #[schema(value_type = Option<String>)]
    pub variant_id: Option<ObjectId>,
    /// Resolved variant carrying its resolved item
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_joined_variant"
    )]
    pub variant: Option<Variant>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_object_id_as_hex_string"
    )]
    #[schema(value_type = Option<String>)]
    pub supplier_id: Option<ObjectId>,
    /// Resolved owner summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<CropOwner>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a crop
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCrop {
    /// Hex id of the city the crop is grown in
    #[validate(length(equal = 24))]
    pub city_id: String,
    pub planting_date: DateTime<Utc>,
    pub harvest_date: DateTime<Utc>,
    /// Hex id of the crop's variant
    #[validate(length(equal = 24))]
    pub variant_id: Option<String>,
    /// Hex id of the owning supplier or user
    #[validate(length(equal = 24))]
    pub supplier_id: Option<String>,
}

/// Partial update for a crop; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCrop {
    #[validate(length(equal = 24))]
    pub city_id: Option<String>,
    pub planting_date: Option<DateTime<Utc>>,
    pub harvest_date: Option<DateTime<Utc>>,
    #[validate(length(equal = 24))]
    pub variant_id: Option<String>,
    #[validate(length(equal = 24))]
    pub supplier_id: Option<String>,
}
