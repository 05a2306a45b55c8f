//! Geo Domain
//!
//! Countries (with their embedded country states) and cities, backed by
//! MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_geo::{
//!     handlers,
//!     mongodb::{MongoCityRepository, MongoCountryRepository},
//!     service::{CityService, CountryService},
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let countries = CountryService::new(MongoCountryRepository::new(&db));
//! let cities = CityService::new(MongoCityRepository::new(&db));
//!
//! let countries_router = handlers::countries_router(countries);
//! let cities_router = handlers::cities_router(cities);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{GeoError, GeoResult};
pub use handlers::{CitiesApiDoc, CountriesApiDoc};
pub use models::{
    City, Country, CountryState, CreateCity, CreateCountry, CreateCountryState, RecordStatus,
    UpdateCity, UpdateCountry, UpdateCountryState,
};
pub use mongodb::{MongoCityRepository, MongoCountryRepository};
pub use repository::{CityRepository, CountryRepository};
pub use service::{CityService, CountryService};
