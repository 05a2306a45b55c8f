use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use tracing::instrument;
use validator::Validate;

use crate::error::{GeoError, GeoResult};
use crate::models::{
    City, Country, CreateCity, CreateCountry, CreateCountryState, UpdateCity, UpdateCountry,
    UpdateCountryState,
};
use crate::repository::{CityRepository, CountryRepository};

/// Business logic for countries and their embedded states
pub struct CountryService<R: CountryRepository> {
    repository: Arc<R>,
}

impl<R: CountryRepository> CountryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_country(&self, input: CreateCountry) -> GeoResult<Country> {
        input
            .validate()
            .map_err(|e| GeoError::Validation(e.to_string()))?;
        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_country(&self, id: ObjectId) -> GeoResult<Country> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(GeoError::CountryNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_countries(&self) -> GeoResult<Vec<Country>> {
        self.repository.list().await
    }

    #[instrument(skip(self, input))]
    pub async fn update_country(&self, id: ObjectId, input: UpdateCountry) -> GeoResult<Country> {
        input
            .validate()
            .map_err(|e| GeoError::Validation(e.to_string()))?;
        self.repository
            .update(id, input)
            .await?
            .ok_or(GeoError::CountryNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_country(&self, id: ObjectId) -> GeoResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(GeoError::CountryNotFound(id))
        }
    }

    #[instrument(skip(self, input))]
    pub async fn add_state(
        &self,
        country_id: ObjectId,
        input: CreateCountryState,
    ) -> GeoResult<Country> {
        input
            .validate()
            .map_err(|e| GeoError::Validation(e.to_string()))?;
        self.repository
            .add_state(country_id, input)
            .await?
            .ok_or(GeoError::CountryNotFound(country_id))
    }

    #[instrument(skip(self, input))]
    pub async fn update_state(
        &self,
        country_id: ObjectId,
        state_id: ObjectId,
        input: UpdateCountryState,
    ) -> GeoResult<Country> {
        input
            .validate()
            .map_err(|e| GeoError::Validation(e.to_string()))?;
        self.repository
            .update_state(country_id, state_id, input)
            .await?
            .ok_or(GeoError::StateNotFound(state_id))
    }

    #[instrument(skip(self))]
    pub async fn remove_state(
        &self,
        country_id: ObjectId,
        state_id: ObjectId,
    ) -> GeoResult<Country> {
        self.repository
            .remove_state(country_id, state_id)
            .await?
            .ok_or(GeoError::StateNotFound(state_id))
    }
}

impl<R: CountryRepository> Clone for CountryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

/// Business logic for cities
pub struct CityService<R: CityRepository> {
    repository: Arc<R>,
}

impl<R: CityRepository> CityService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_city(&self, state_id: ObjectId, input: CreateCity) -> GeoResult<City> {
        input
            .validate()
            .map_err(|e| GeoError::Validation(e.to_string()))?;
        self.repository.create(state_id, input).await
    }

    #[instrument(skip(self))]
    pub async fn get_city(&self, id: ObjectId) -> GeoResult<City> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(GeoError::CityNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_cities_by_state(&self, state_id: ObjectId) -> GeoResult<Vec<City>> {
        self.repository.list_by_state(state_id).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_city(&self, id: ObjectId, input: UpdateCity) -> GeoResult<City> {
        input
            .validate()
            .map_err(|e| GeoError::Validation(e.to_string()))?;
        self.repository
            .update(id, input)
            .await?
            .ok_or(GeoError::CityNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_city(&self, id: ObjectId) -> GeoResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(GeoError::CityNotFound(id))
        }
    }
}

impl<R: CityRepository> Clone for CityService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordStatus;
    use crate::repository::{MockCityRepository, MockCountryRepository};
    use mockall::predicate::eq;

    fn sample_country(id: ObjectId) -> Country {
        Country {
            id,
            country_name: "Colombia".to_string(),
            country_code: "CO".to_string(),
            states: vec![],
            record_status: RecordStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_get_country_maps_missing_to_not_found() {
        let mut mock_repo = MockCountryRepository::new();
        let id = ObjectId::new();

        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let service = CountryService::new(mock_repo);
        let result = service.get_country(id).await;

        assert!(matches!(result, Err(GeoError::CountryNotFound(found)) if found == id));
    }

    #[tokio::test]
    async fn test_create_country_rejects_invalid_code_before_store_access() {
        // No expectations set: the repository must not be touched
        let mock_repo = MockCountryRepository::new();
        let service = CountryService::new(mock_repo);

        let result = service
            .create_country(CreateCountry {
                country_name: "Colombia".to_string(),
                country_code: "COLOMBIA".to_string(),
            })
            .await;

        assert!(matches!(result, Err(GeoError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_state_missing_country_is_not_found() {
        let mut mock_repo = MockCountryRepository::new();
        let country_id = ObjectId::new();

        mock_repo
            .expect_add_state()
            .returning(|_, _| Ok(None));

        let service = CountryService::new(mock_repo);
        let result = service
            .add_state(
                country_id,
                CreateCountryState {
                    state_name: "Antioquia".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(GeoError::CountryNotFound(found)) if found == country_id));
    }

    #[tokio::test]
    async fn test_remove_state_missing_state_is_not_found_not_a_silent_success() {
        let mut mock_repo = MockCountryRepository::new();
        let country_id = ObjectId::new();
        let state_id = ObjectId::new();

        mock_repo
            .expect_remove_state()
            .with(eq(country_id), eq(state_id))
            .returning(|_, _| Ok(None));

        let service = CountryService::new(mock_repo);
        let result = service.remove_state(country_id, state_id).await;

        assert!(matches!(result, Err(GeoError::StateNotFound(found)) if found == state_id));
    }

    #[tokio::test]
    async fn test_update_country_returns_updated_document() {
        let mut mock_repo = MockCountryRepository::new();
        let id = ObjectId::new();
        let updated = sample_country(id);

        mock_repo
            .expect_update()
            .returning(move |_, _| Ok(Some(sample_country(id))));

        let service = CountryService::new(mock_repo);
        let result = service
            .update_country(
                id,
                UpdateCountry {
                    country_name: Some("Colombia".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(result.id, updated.id);
        assert_eq!(result.country_name, "Colombia");
    }

    #[tokio::test]
    async fn test_delete_city_missing_is_not_found() {
        let mut mock_repo = MockCityRepository::new();
        let id = ObjectId::new();

        mock_repo
            .expect_delete()
            .with(eq(id))
            .returning(|_| Ok(false));

        let service = CityService::new(mock_repo);
        let result = service.delete_city(id).await;

        assert!(matches!(result, Err(GeoError::CityNotFound(found)) if found == id));
    }

    #[tokio::test]
    async fn test_create_city_uses_path_state_reference() {
        let mut mock_repo = MockCityRepository::new();
        let state_id = ObjectId::new();
        let city_id = ObjectId::new();

        mock_repo
            .expect_create()
            .with(eq(state_id), mockall::predicate::always())
            .returning(move |state, input| {
                Ok(City {
                    id: city_id,
                    city_name: input.city_name,
                    country_state_id: state,
                    record_status: RecordStatus::Active,
                })
            });

        let service = CityService::new(mock_repo);
        let city = service
            .create_city(
                state_id,
                CreateCity {
                    city_name: "Medellin".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(city.country_state_id, state_id);
        assert_eq!(city.city_name, "Medellin");
    }
}
