use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CropError {
    #[error("Crop not found: {0}")]
    NotFound(ObjectId),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type CropResult<T> = Result<T, CropError>;

/// Convert CropError to AppError for standardized error responses
impl From<CropError> for AppError {
    fn from(err: CropError) -> Self {
        match err {
            CropError::NotFound(id) => {
                AppError::NotFound(format!("Crop {} not found", id.to_hex()))
            }
            CropError::Validation(msg) => AppError::BadRequest(msg),
            CropError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CropError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CropError {
    fn from(err: mongodb::error::Error) -> Self {
        CropError::Database(err.to_string())
    }
}
