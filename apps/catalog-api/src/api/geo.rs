//! Country, country-state and city API routes

use axum::Router;
use domain_geo::{
    handlers, CityService, CountryService, MongoCityRepository, MongoCountryRepository,
};

use crate::state::AppState;

/// Create the countries router (country-state mutations included)
pub fn countries_router(state: &AppState) -> Router {
    let service = CountryService::new(MongoCountryRepository::new(&state.db));
    handlers::countries_router(service)
}

/// Create the cities router, nested under country states
pub fn cities_router(state: &AppState) -> Router {
    let service = CityService::new(MongoCityRepository::new(&state.db));
    handlers::cities_router(service)
}
