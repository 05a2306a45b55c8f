//! User domain models and DTOs

use chrono::{DateTime, Utc};
use domain_crops::Crop;
use domain_geo::City;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::Validate;

/// Lifecycle marker for user records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

/// A user in its populated form: city resolved, owned crops joined in
/// with their variants and items, and the role carried through.
///
/// The stored password hash never reaches this type; the aggregation
/// projects it away and the struct has no field to receive it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
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
    pub role: String,
    pub record_status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The minimal stored view used to check a login attempt
///
/// This is the only type that ever holds the password hash and it is
/// never serialized.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCredentials {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub hashed_password: String,
}

/// Input for registering a user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 120))]
    pub surname: String,
    #[validate(length(min = 1, max = 40))]
    pub document_type: String,
    #[validate(length(min = 1, max = 40))]
    pub document_number: String,
    /// Hex id of the user's city
    #[validate(length(equal = 24))]
    pub city_id: Option<String>,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 72))]
    pub password: String,
    pub address_line1: Option<String>,
    pub phone_number: Option<String>,
}

/// Partial update for a user; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
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

/// Login request payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 72))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document};

    #[test]
    fn test_user_json_never_contains_a_password_hash() {
        let id = ObjectId::new();
        let now = Utc::now();
        let user = User {
            id,
            name: "Julian".to_string(),
            surname: "Rios".to_string(),
            document_type: "CC".to_string(),
            document_number: "900123".to_string(),
            city: None,
            email: Some("julian@futuagro.test".to_string()),
            address_line1: None,
            phone_number: None,
            crops: vec![],
            role: "user".to_string(),
            record_status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["_id"], serde_json::json!(id.to_hex()));
        assert_eq!(json["role"], serde_json::json!("user"));
        assert!(json.get("hashedPassword").is_none());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_user_decode_ignores_a_stray_hash_field() {
        let document = doc! {
            "_id": ObjectId::new(),
            "name": "Julian",
            "surname": "Rios",
            "documentType": "CC",
            "documentNumber": "900123",
            "hashedPassword": "$argon2id$v=19$m=19456,t=2,p=1$abc$def",
            "role": "user",
            "recordStatus": "active",
            "createdAt": Utc::now().to_rfc3339(),
            "updatedAt": Utc::now().to_rfc3339(),
        };

        let user: User = from_document(document).unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("hashedPassword").is_none());
    }

    #[test]
    fn test_user_decodes_crop_stored_without_variant() {
        let document = doc! {
            "_id": ObjectId::new(),
            "name": "Julian",
            "surname": "Rios",
            "documentType": "CC",
            "documentNumber": "900123",
            "role": "user",
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

        let user: User = from_document(document).unwrap();
        assert_eq!(user.crops.len(), 1);
        assert!(user.crops[0].variant.is_none());
    }

    #[test]
    fn test_credentials_decode_from_stored_document() {
        let document = doc! {
            "_id": ObjectId::new(),
            "name": "Julian",
            "email": "julian@futuagro.test",
            "hashedPassword": "$argon2id$v=19$m=19456,t=2,p=1$abc$def",
            "role": "user",
        };

        let credentials: UserCredentials = from_document(document).unwrap();
        assert_eq!(credentials.email, "julian@futuagro.test");
        assert!(credentials.hashed_password.starts_with("$argon2id$"));
    }

    #[test]
    fn test_create_user_rejects_short_password() {
        let input = CreateUser {
            name: "Julian".to_string(),
            surname: "Rios".to_string(),
            document_type: "CC".to_string(),
            document_number: "900123".to_string(),
            city_id: None,
            email: "julian@futuagro.test".to_string(),
            password: "abc".to_string(),
            address_line1: None,
            phone_number: None,
        };

        assert!(input.validate().is_err());
    }

    #[test]
    fn test_login_request_rejects_malformed_email() {
        let input = LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret-password".to_string(),
        };

        assert!(input.validate().is_err());
    }
}
