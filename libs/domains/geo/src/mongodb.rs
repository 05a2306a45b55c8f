//! MongoDB implementations of the geo repositories

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, to_bson, Bson, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};
use tracing::instrument;

use crate::error::{GeoError, GeoResult};
use crate::models::{
    City, Country, CreateCity, CreateCountry, CreateCountryState, RecordStatus, UpdateCity,
    UpdateCountry, UpdateCountryState,
};
use crate::repository::{CityRepository, CountryRepository};

const COUNTRY_COLLECTION: &str = "countries";
const CITY_COLLECTION: &str = "cities";

/// Upper bound for the embedded-state find-and-modify round trips
const WRITE_MAX_TIME: Duration = Duration::from_secs(15);

/// MongoDB-backed country repository
pub struct MongoCountryRepository {
    collection: Collection<Country>,
    documents: Collection<Document>,
}

impl MongoCountryRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COUNTRY_COLLECTION),
            documents: database.collection(COUNTRY_COLLECTION),
        }
    }

    fn write_options() -> FindOneAndUpdateOptions {
        FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .max_time(WRITE_MAX_TIME)
            .build()
    }
}

/// Build the $set document for a partial country update
fn build_country_update(input: &UpdateCountry) -> Document {
    let mut set = Document::new();
    if let Some(name) = &input.country_name {
        set.insert("countryName", name);
    }
    if let Some(code) = &input.country_code {
        set.insert("countryCode", code);
    }
    if let Some(status) = &input.record_status {
        set.insert("recordStatus", to_bson(status).unwrap_or(Bson::Null));
    }
    set
}

/// Build the positional $set document for a matched embedded state
fn build_state_update(input: &UpdateCountryState) -> Document {
    let mut set = Document::new();
    if let Some(name) = &input.state_name {
        set.insert("states.$.stateName", name);
    }
    if let Some(status) = &input.record_status {
        set.insert("states.$.recordStatus", to_bson(status).unwrap_or(Bson::Null));
    }
    set
}

#[async_trait]
impl CountryRepository for MongoCountryRepository {
    #[instrument(skip(self, input))]
    async fn create(&self, input: CreateCountry) -> GeoResult<Country> {
        let document = doc! {
            "countryName": &input.country_name,
            "countryCode": &input.country_code,
            "states": [],
            "recordStatus": to_bson(&RecordStatus::Active).unwrap_or(Bson::Null),
        };

        let result = self.documents.insert_one(document).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| GeoError::Database("insert did not return an ObjectId".to_string()))?;

        tracing::info!(country_id = %id, "Country created");
        self.get_by_id(id)
            .await?
            .ok_or_else(|| GeoError::Database("inserted country is missing".to_string()))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> GeoResult<Option<Country>> {
        let country = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(country)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> GeoResult<Vec<Country>> {
        let options = FindOptions::builder()
            .sort(doc! { "countryName": 1, "states.stateName": 1 })
            .build();

        let mut cursor = self.collection.find(doc! {}).with_options(options).await?;
        let mut countries = Vec::new();
        while let Some(row) = cursor.next().await {
            match row {
                Ok(country) => countries.push(country),
                // One corrupt document must not fail the whole listing
                Err(error) => tracing::warn!(%error, "skipping undecodable country document"),
            }
        }
        Ok(countries)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: UpdateCountry) -> GeoResult<Option<Country>> {
        let set = build_country_update(&input);
        if set.is_empty() {
            return self.get_by_id(id).await;
        }

        let country = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .with_options(Self::write_options())
            .await?;
        Ok(country)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> GeoResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self, input))]
    async fn add_state(
        &self,
        country_id: ObjectId,
        input: CreateCountryState,
    ) -> GeoResult<Option<Country>> {
        let state_id = ObjectId::new();
        let state = doc! {
            "_id": state_id,
            "stateName": &input.state_name,
            "recordStatus": to_bson(&RecordStatus::Active).unwrap_or(Bson::Null),
        };

        let country = self
            .collection
            .find_one_and_update(doc! { "_id": country_id }, doc! { "$push": { "states": state } })
            .with_options(Self::write_options())
            .await?;

        if country.is_some() {
            tracing::info!(country_id = %country_id, state_id = %state_id, "Country state added");
        }
        Ok(country)
    }

    #[instrument(skip(self, input))]
    async fn update_state(
        &self,
        country_id: ObjectId,
        state_id: ObjectId,
        input: UpdateCountryState,
    ) -> GeoResult<Option<Country>> {
        let set = build_state_update(&input);
        // Compound filter: the positional $ operator needs the array match,
        // and a missing state must surface as no-match rather than a no-op
        let filter = doc! { "_id": country_id, "states._id": state_id };
        if set.is_empty() {
            let country = self.collection.find_one(filter).await?;
            return Ok(country);
        }

        let country = self
            .collection
            .find_one_and_update(filter, doc! { "$set": set })
            .with_options(Self::write_options())
            .await?;
        Ok(country)
    }

    #[instrument(skip(self))]
    async fn remove_state(
        &self,
        country_id: ObjectId,
        state_id: ObjectId,
    ) -> GeoResult<Option<Country>> {
        let filter = doc! { "_id": country_id, "states._id": state_id };
        let update = doc! { "$pull": { "states": { "_id": state_id } } };

        let country = self
            .collection
            .find_one_and_update(filter, update)
            .with_options(Self::write_options())
            .await?;
        Ok(country)
    }
}

/// MongoDB-backed city repository
pub struct MongoCityRepository {
    collection: Collection<City>,
    documents: Collection<Document>,
}

impl MongoCityRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(CITY_COLLECTION),
            documents: database.collection(CITY_COLLECTION),
        }
    }
}

/// Build the $set document for a partial city update
fn build_city_update(input: &UpdateCity) -> GeoResult<Document> {
    let mut set = Document::new();
    if let Some(name) = &input.city_name {
        set.insert("cityName", name);
    }
    if let Some(state_id) = &input.country_state_id {
        let parsed = ObjectId::parse_str(state_id)
            .map_err(|_| GeoError::Validation(format!("Invalid countryStateId: {state_id}")))?;
        set.insert("countryStateId", parsed);
    }
    if let Some(status) = &input.record_status {
        set.insert("recordStatus", to_bson(status).unwrap_or(Bson::Null));
    }
    Ok(set)
}

#[async_trait]
impl CityRepository for MongoCityRepository {
    #[instrument(skip(self, input))]
    async fn create(&self, state_id: ObjectId, input: CreateCity) -> GeoResult<City> {
        let document = doc! {
            "cityName": &input.city_name,
            "countryStateId": state_id,
            "recordStatus": to_bson(&RecordStatus::Active).unwrap_or(Bson::Null),
        };

        let result = self.documents.insert_one(document).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| GeoError::Database("insert did not return an ObjectId".to_string()))?;

        tracing::info!(city_id = %id, state_id = %state_id, "City created");
        self.get_by_id(id)
            .await?
            .ok_or_else(|| GeoError::Database("inserted city is missing".to_string()))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> GeoResult<Option<City>> {
        let city = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(city)
    }

    #[instrument(skip(self))]
    async fn list_by_state(&self, state_id: ObjectId) -> GeoResult<Vec<City>> {
        let mut cursor = self
            .collection
            .find(doc! { "countryStateId": state_id })
            .await?;

        let mut cities = Vec::new();
        while let Some(row) = cursor.next().await {
            match row {
                Ok(city) => cities.push(city),
                Err(error) => tracing::warn!(%error, "skipping undecodable city document"),
            }
        }
        Ok(cities)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: UpdateCity) -> GeoResult<Option<City>> {
        let set = build_city_update(&input)?;
        if set.is_empty() {
            return self.get_by_id(id).await;
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .max_time(WRITE_MAX_TIME)
            .build();
        let city = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .with_options(options)
            .await?;
        Ok(city)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> GeoResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_country_update_skips_absent_fields() {
        let input = UpdateCountry {
            country_name: Some("Colombia".to_string()),
            ..Default::default()
        };

        let set = build_country_update(&input);
        assert_eq!(set.get_str("countryName").unwrap(), "Colombia");
        assert!(!set.contains_key("countryCode"));
        assert!(!set.contains_key("recordStatus"));
    }

    #[test]
    fn test_build_country_update_includes_status() {
        let input = UpdateCountry {
            record_status: Some(RecordStatus::Inactive),
            ..Default::default()
        };

        let set = build_country_update(&input);
        assert_eq!(set.get_str("recordStatus").unwrap(), "inactive");
    }

    #[test]
    fn test_build_country_update_empty_for_empty_input() {
        let set = build_country_update(&UpdateCountry::default());
        assert!(set.is_empty());
    }

    #[test]
    fn test_build_state_update_uses_positional_paths() {
        let input = UpdateCountryState {
            state_name: Some("Antioquia".to_string()),
            record_status: Some(RecordStatus::Active),
        };

        let set = build_state_update(&input);
        assert_eq!(set.get_str("states.$.stateName").unwrap(), "Antioquia");
        assert_eq!(set.get_str("states.$.recordStatus").unwrap(), "active");
    }

    #[test]
    fn test_build_city_update_parses_state_reference() {
        let state_id = ObjectId::new();
        let input = UpdateCity {
            country_state_id: Some(state_id.to_hex()),
            ..Default::default()
        };

        let set = build_city_update(&input).unwrap();
        assert_eq!(set.get_object_id("countryStateId").unwrap(), state_id);
    }

    #[test]
    fn test_build_city_update_rejects_malformed_state_reference() {
        let input = UpdateCity {
            country_state_id: Some("zzzzzzzzzzzzzzzzzzzzzzzz".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            build_city_update(&input),
            Err(GeoError::Validation(_))
        ));
    }
}
