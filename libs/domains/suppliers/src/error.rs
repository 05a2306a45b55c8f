use axum::response::{IntoResponse, Response};
use axum_helpers::errors::AppError;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

pub type SupplierResult<T> = Result<T, SupplierError>;

#[derive(Debug, Error)]
pub enum SupplierError {
    #[error("Supplier not found: {0}")]
    NotFound(ObjectId),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<mongodb::error::Error> for SupplierError {
    fn from(error: mongodb::error::Error) -> Self {
        SupplierError::Database(error.to_string())
    }
}

impl From<SupplierError> for AppError {
    fn from(error: SupplierError) -> Self {
        match error {
            SupplierError::NotFound(id) => {
                AppError::NotFound(format!("Supplier {} not found", id.to_hex()))
            }
            SupplierError::Validation(msg) => AppError::BadRequest(msg),
            SupplierError::Database(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for SupplierError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
