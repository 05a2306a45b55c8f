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

/// A state embedded inside its parent country's `states` array
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountryState {
    /// Generated identifier, unique within the parent country
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String)]
    pub id: ObjectId,
    pub state_name: String,
    pub record_status: RecordStatus,
}

/// Country document with its embedded, ordered list of states
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String)]
    pub id: ObjectId,
    pub country_name: String,
    /// ISO-style short code
    pub country_code: String,
    #[serde(default)]
    pub states: Vec<CountryState>,
    pub record_status: RecordStatus,
}

/// City document referencing the country state it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct City {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String)]
    pub id: ObjectId,
    pub city_name: String,
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String)]
    pub country_state_id: ObjectId,
    pub record_status: RecordStatus,
}

/// Payload for creating a country
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCountry {
    #[validate(length(min = 1, max = 120))]
    pub country_name: String,
    #[validate(length(min = 2, max = 3))]
    pub country_code: String,
}

/// Partial update for a country; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCountry {
    #[validate(length(min = 1, max = 120))]
    pub country_name: Option<String>,
    #[validate(length(min = 2, max = 3))]
    pub country_code: Option<String>,
    pub record_status: Option<RecordStatus>,
}

/// Payload for appending a state to a country
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCountryState {
    #[validate(length(min = 1, max = 120))]
    pub state_name: String,
}

/// Partial update for an embedded state
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCountryState {
    #[validate(length(min = 1, max = 120))]
    pub state_name: Option<String>,
    pub record_status: Option<RecordStatus>,
}

/// Payload for creating a city under a country state
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCity {
    #[validate(length(min = 1, max = 120))]
    pub city_name: String,
}

/// Partial update for a city
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCity {
    #[validate(length(min = 1, max = 120))]
    pub city_name: Option<String>,
    /// Hex representation of the new country state reference
    #[validate(length(equal = 24))]
    pub country_state_id: Option<String>,
    pub record_status: Option<RecordStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document};

    #[test]
    fn test_record_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RecordStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::to_string(&RecordStatus::Inactive).unwrap(),
            "\"inactive\""
        );
    }

    #[test]
    fn test_record_status_display_matches_serde() {
        assert_eq!(RecordStatus::Active.to_string(), "active");
        assert_eq!(RecordStatus::Inactive.to_string(), "inactive");
    }

    #[test]
    fn test_country_serializes_with_hex_id_and_camel_case_keys() {
        let id = ObjectId::new();
        let country = Country {
            id,
            country_name: "Colombia".to_string(),
            country_code: "CO".to_string(),
            states: vec![],
            record_status: RecordStatus::Active,
        };

        let json = serde_json::to_value(&country).unwrap();
        assert_eq!(json["_id"], serde_json::json!(id.to_hex()));
        assert_eq!(json["countryName"], serde_json::json!("Colombia"));
        assert_eq!(json["countryCode"], serde_json::json!("CO"));
        assert_eq!(json["recordStatus"], serde_json::json!("active"));
        assert!(json["states"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_country_decodes_from_stored_document() {
        let state_id = ObjectId::new();
        let document = doc! {
            "_id": ObjectId::new(),
            "countryName": "Colombia",
            "countryCode": "CO",
            "states": [
                { "_id": state_id, "stateName": "Antioquia", "recordStatus": "active" }
            ],
            "recordStatus": "active",
        };

        let country: Country = from_document(document).unwrap();
        assert_eq!(country.states.len(), 1);
        assert_eq!(country.states[0].id, state_id);
        assert_eq!(country.states[0].state_name, "Antioquia");
    }

    #[test]
    fn test_country_decodes_without_states_field() {
        let document = doc! {
            "_id": ObjectId::new(),
            "countryName": "Peru",
            "countryCode": "PE",
            "recordStatus": "inactive",
        };

        let country: Country = from_document(document).unwrap();
        assert!(country.states.is_empty());
        assert_eq!(country.record_status, RecordStatus::Inactive);
    }

    #[test]
    fn test_country_decode_fails_without_record_status() {
        let document = doc! {
            "_id": ObjectId::new(),
            "countryName": "Peru",
            "countryCode": "PE",
        };

        assert!(from_document::<Country>(document).is_err());
    }

    #[test]
    fn test_city_serializes_state_reference_as_hex() {
        let state_id = ObjectId::new();
        let city = City {
            id: ObjectId::new(),
            city_name: "Medellin".to_string(),
            country_state_id: state_id,
            record_status: RecordStatus::Active,
        };

        let json = serde_json::to_value(&city).unwrap();
        assert_eq!(json["countryStateId"], serde_json::json!(state_id.to_hex()));
        assert_eq!(json["cityName"], serde_json::json!("Medellin"));
    }

    #[test]
    fn test_update_country_deserializes_missing_fields_as_none() {
        let input: UpdateCountry =
            serde_json::from_str(r#"{"countryName": "Ecuador"}"#).unwrap();
        assert_eq!(input.country_name.as_deref(), Some("Ecuador"));
        assert!(input.country_code.is_none());
        assert!(input.record_status.is_none());
    }

    #[test]
    fn test_create_country_validates_code_length() {
        let input = CreateCountry {
            country_name: "Colombia".to_string(),
            country_code: "COLOMBIA".to_string(),
        };
        assert!(validator::Validate::validate(&input).is_err());
    }

    #[test]
    fn test_update_city_validates_state_reference_length() {
        let input = UpdateCity {
            country_state_id: Some("not-a-hex-id".to_string()),
            ..Default::default()
        };
        assert!(validator::Validate::validate(&input).is_err());
    }
}
