//! HTTP handlers for the countries and cities APIs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestObjectIdResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    ObjectIdPath, ValidatedJson,
};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{GeoError, GeoResult};
use crate::models::{
    City, Country, CountryState, CreateCity, CreateCountry, CreateCountryState, RecordStatus,
    UpdateCity, UpdateCountry, UpdateCountryState,
};
use crate::repository::{CityRepository, CountryRepository};
use crate::service::{CityService, CountryService};

/// OpenAPI documentation for the countries API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_countries,
        create_country,
        get_country,
        update_country,
        delete_country,
        add_country_state,
        update_country_state,
        delete_country_state,
    ),
    components(
        schemas(
            Country, CountryState, RecordStatus,
            CreateCountry, UpdateCountry, CreateCountryState, UpdateCountryState
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestObjectIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Countries", description = "Country and country-state endpoints")
    )
)]
pub struct CountriesApiDoc;

/// OpenAPI documentation for the cities API
#[derive(OpenApi)]
#[openapi(
    paths(list_cities, create_city, get_city, update_city, delete_city),
    components(
        schemas(City, RecordStatus, CreateCity, UpdateCity),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestObjectIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Cities", description = "City endpoints nested under country states")
    )
)]
pub struct CitiesApiDoc;

/// Create the countries router, including the nested country-state routes
pub fn countries_router<R: CountryRepository + 'static>(service: CountryService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_countries).post(create_country))
        .route(
            "/{id}",
            get(get_country).put(update_country).delete(delete_country),
        )
        .route("/{id}/country-states", post(add_country_state))
        .route(
            "/{id}/country-states/{state_id}",
            axum::routing::put(update_country_state).delete(delete_country_state),
        )
        .with_state(shared_service)
}

/// Create the cities router, mounted under /country-states
pub fn cities_router<R: CityRepository + 'static>(service: CityService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/{state_id}/cities", get(list_cities).post(create_city))
        .route(
            "/{state_id}/cities/{city_id}",
            get(get_city).put(update_city).delete(delete_city),
        )
        .with_state(shared_service)
}

fn parse_id(value: &str) -> GeoResult<ObjectId> {
    ObjectId::parse_str(value).map_err(|_| GeoError::Validation(format!("Invalid id: {value}")))
}

/// List all countries sorted by name
#[utoipa::path(
    get,
    path = "",
    tag = "Countries",
    responses(
        (status = 200, description = "List of countries", body = Vec<Country>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_countries<R: CountryRepository>(
    State(service): State<Arc<CountryService<R>>>,
) -> GeoResult<Json<Vec<Country>>> {
    let countries = service.list_countries().await?;
    Ok(Json(countries))
}

/// Create a new country
#[utoipa::path(
    post,
    path = "",
    tag = "Countries",
    request_body = CreateCountry,
    responses(
        (status = 201, description = "Country created", body = Country),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_country<R: CountryRepository>(
    State(service): State<Arc<CountryService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateCountry>,
) -> GeoResult<impl IntoResponse> {
    let country = service.create_country(input).await?;
    Ok((StatusCode::CREATED, Json(country)))
}

/// Get a country by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Countries",
    params(("id" = String, Path, description = "Country id")),
    responses(
        (status = 200, description = "Country found", body = Country),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_country<R: CountryRepository>(
    State(service): State<Arc<CountryService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> GeoResult<Json<Country>> {
    let country = service.get_country(id).await?;
    Ok(Json(country))
}

/// Update a country; only supplied fields are changed
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Countries",
    params(("id" = String, Path, description = "Country id")),
    request_body = UpdateCountry,
    responses(
        (status = 200, description = "Country updated", body = Country),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_country<R: CountryRepository>(
    State(service): State<Arc<CountryService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateCountry>,
) -> GeoResult<Json<Country>> {
    let country = service.update_country(id, input).await?;
    Ok(Json(country))
}

/// Delete a country
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Countries",
    params(("id" = String, Path, description = "Country id")),
    responses(
        (status = 204, description = "Country deleted"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_country<R: CountryRepository>(
    State(service): State<Arc<CountryService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> GeoResult<StatusCode> {
    service.delete_country(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Append a new state to a country
#[utoipa::path(
    post,
    path = "/{id}/country-states",
    tag = "Countries",
    params(("id" = String, Path, description = "Country id")),
    request_body = CreateCountryState,
    responses(
        (status = 201, description = "State added, updated country returned", body = Country),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_country_state<R: CountryRepository>(
    State(service): State<Arc<CountryService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<CreateCountryState>,
) -> GeoResult<impl IntoResponse> {
    let country = service.add_state(id, input).await?;
    Ok((StatusCode::CREATED, Json(country)))
}

/// Update a state in place, addressed by country and state id
#[utoipa::path(
    put,
    path = "/{id}/country-states/{state_id}",
    tag = "Countries",
    params(
        ("id" = String, Path, description = "Country id"),
        ("state_id" = String, Path, description = "State id")
    ),
    request_body = UpdateCountryState,
    responses(
        (status = 200, description = "State updated, updated country returned", body = Country),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_country_state<R: CountryRepository>(
    State(service): State<Arc<CountryService<R>>>,
    Path((id, state_id)): Path<(String, String)>,
    ValidatedJson(input): ValidatedJson<UpdateCountryState>,
) -> GeoResult<Json<Country>> {
    let country_id = parse_id(&id)?;
    let state_id = parse_id(&state_id)?;
    let country = service.update_state(country_id, state_id, input).await?;
    Ok(Json(country))
}

/// Remove a state from a country
#[utoipa::path(
    delete,
    path = "/{id}/country-states/{state_id}",
    tag = "Countries",
    params(
        ("id" = String, Path, description = "Country id"),
        ("state_id" = String, Path, description = "State id")
    ),
    responses(
        (status = 200, description = "State removed, updated country returned", body = Country),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_country_state<R: CountryRepository>(
    State(service): State<Arc<CountryService<R>>>,
    Path((id, state_id)): Path<(String, String)>,
) -> GeoResult<Json<Country>> {
    let country_id = parse_id(&id)?;
    let state_id = parse_id(&state_id)?;
    let country = service.remove_state(country_id, state_id).await?;
    Ok(Json(country))
}

/// List cities under a country state
#[utoipa::path(
    get,
    path = "/{state_id}/cities",
    tag = "Cities",
    params(("state_id" = String, Path, description = "Country state id")),
    responses(
        (status = 200, description = "List of cities", body = Vec<City>),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_cities<R: CityRepository>(
    State(service): State<Arc<CityService<R>>>,
    ObjectIdPath(state_id): ObjectIdPath,
) -> GeoResult<Json<Vec<City>>> {
    let cities = service.list_cities_by_state(state_id).await?;
    Ok(Json(cities))
}

/// Create a city under a country state
#[utoipa::path(
    post,
    path = "/{state_id}/cities",
    tag = "Cities",
    params(("state_id" = String, Path, description = "Country state id")),
    request_body = CreateCity,
    responses(
        (status = 201, description = "City created", body = City),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_city<R: CityRepository>(
    State(service): State<Arc<CityService<R>>>,
    ObjectIdPath(state_id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<CreateCity>,
) -> GeoResult<impl IntoResponse> {
    let city = service.create_city(state_id, input).await?;
    Ok((StatusCode::CREATED, Json(city)))
}

/// Get a city by id
#[utoipa::path(
    get,
    path = "/{state_id}/cities/{city_id}",
    tag = "Cities",
    params(
        ("state_id" = String, Path, description = "Country state id"),
        ("city_id" = String, Path, description = "City id")
    ),
    responses(
        (status = 200, description = "City found", body = City),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_city<R: CityRepository>(
    State(service): State<Arc<CityService<R>>>,
    Path((_state_id, city_id)): Path<(String, String)>,
) -> GeoResult<Json<City>> {
    let city_id = parse_id(&city_id)?;
    let city = service.get_city(city_id).await?;
    Ok(Json(city))
}

/// Update a city; only supplied fields are changed
#[utoipa::path(
    put,
    path = "/{state_id}/cities/{city_id}",
    tag = "Cities",
    params(
        ("state_id" = String, Path, description = "Country state id"),
        ("city_id" = String, Path, description = "City id")
    ),
    request_body = UpdateCity,
    responses(
        (status = 200, description = "City updated", body = City),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_city<R: CityRepository>(
    State(service): State<Arc<CityService<R>>>,
    Path((_state_id, city_id)): Path<(String, String)>,
    ValidatedJson(input): ValidatedJson<UpdateCity>,
) -> GeoResult<Json<City>> {
    let city_id = parse_id(&city_id)?;
    let city = service.update_city(city_id, input).await?;
    Ok(Json(city))
}

/// Delete a city
#[utoipa::path(
    delete,
    path = "/{state_id}/cities/{city_id}",
    tag = "Cities",
    params(
        ("state_id" = String, Path, description = "Country state id"),
        ("city_id" = String, Path, description = "City id")
    ),
    responses(
        (status = 204, description = "City deleted"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_city<R: CityRepository>(
    State(service): State<Arc<CityService<R>>>,
    Path((_state_id, city_id)): Path<(String, String)>,
) -> GeoResult<StatusCode> {
    let city_id = parse_id(&city_id)?;
    service.delete_city(city_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
