use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::GeoResult;
use crate::models::{
    City, Country, CreateCity, CreateCountry, CreateCountryState, UpdateCity, UpdateCountry,
    UpdateCountryState,
};

/// Repository trait for Country persistence, including the embedded
/// country-state mutations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CountryRepository: Send + Sync {
    /// Insert a new country and return the stored document
    async fn create(&self, input: CreateCountry) -> GeoResult<Country>;

    /// Get a country by id
    async fn get_by_id(&self, id: ObjectId) -> GeoResult<Option<Country>>;

    /// List all countries sorted alphabetically by name
    async fn list(&self) -> GeoResult<Vec<Country>>;

    /// Apply a partial update; None when the id does not match
    async fn update(&self, id: ObjectId, input: UpdateCountry) -> GeoResult<Option<Country>>;

    /// Hard delete; false when the id does not match
    async fn delete(&self, id: ObjectId) -> GeoResult<bool>;

    /// Append a new state to the country's `states` array
    async fn add_state(
        &self,
        country_id: ObjectId,
        input: CreateCountryState,
    ) -> GeoResult<Option<Country>>;

    /// Update the matched state in place, preserving its id and position
    async fn update_state(
        &self,
        country_id: ObjectId,
        state_id: ObjectId,
        input: UpdateCountryState,
    ) -> GeoResult<Option<Country>>;

    /// Remove the state by id; None when the country or state does not match
    async fn remove_state(
        &self,
        country_id: ObjectId,
        state_id: ObjectId,
    ) -> GeoResult<Option<Country>>;
}

/// Repository trait for City persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CityRepository: Send + Sync {
    /// Insert a new city under the given country state
    async fn create(&self, state_id: ObjectId, input: CreateCity) -> GeoResult<City>;

    /// Get a city by id
    async fn get_by_id(&self, id: ObjectId) -> GeoResult<Option<City>>;

    /// List cities referencing the given country state
    async fn list_by_state(&self, state_id: ObjectId) -> GeoResult<Vec<City>>;

    /// Apply a partial update; None when the id does not match
    async fn update(&self, id: ObjectId, input: UpdateCity) -> GeoResult<Option<City>>;

    /// Hard delete; false when the id does not match
    async fn delete(&self, id: ObjectId) -> GeoResult<bool>;
}
