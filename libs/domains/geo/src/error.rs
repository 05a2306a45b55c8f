use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Country not found: {0}")]
    CountryNotFound(ObjectId),

    #[error("Country state not found: {0}")]
    StateNotFound(ObjectId),

    #[error("City not found: {0}")]
    CityNotFound(ObjectId),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type GeoResult<T> = Result<T, GeoError>;

/// Convert GeoError to AppError for standardized error responses
impl From<GeoError> for AppError {
    fn from(err: GeoError) -> Self {
        match err {
            GeoError::CountryNotFound(id) => {
                AppError::NotFound(format!("Country {} not found", id.to_hex()))
            }
            GeoError::StateNotFound(id) => {
                AppError::NotFound(format!("Country state {} not found", id.to_hex()))
            }
            GeoError::CityNotFound(id) => {
                AppError::NotFound(format!("City {} not found", id.to_hex()))
            }
            GeoError::Validation(msg) => AppError::BadRequest(msg),
            GeoError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for GeoError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for GeoError {
    fn from(err: mongodb::error::Error) -> Self {
        GeoError::Database(err.to_string())
    }
}
