//! ObjectId path parameter extractor with automatic validation.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use mongodb::bson::oid::ObjectId;

/// Extractor for ObjectId path parameters.
///
/// Automatically parses and validates a 24-character hex id from path
/// parameters, returning a proper error response if invalid. The parse
/// happens before any handler code runs, so malformed ids never reach
/// the store.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::extractors::ObjectIdPath;
///
/// async fn get_supplier(ObjectIdPath(id): ObjectIdPath) -> String {
///     format!("Supplier ID: {}", id.to_hex())
/// }
///
/// let app = Router::new().route("/suppliers/{id}", get(get_supplier));
/// ```
pub struct ObjectIdPath(pub ObjectId);

impl<S> FromRequestParts<S> for ObjectIdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        match ObjectId::parse_str(&id) {
            Ok(oid) => Ok(ObjectIdPath(oid)),
            Err(_) => Err(AppError::BadRequest(format!("Invalid id: {}", id)).into_response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hex_parses() {
        let id = ObjectId::new();
        let parsed = ObjectId::parse_str(id.to_hex()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert!(ObjectId::parse_str("not-an-id").is_err());
        assert!(ObjectId::parse_str("").is_err());
        // Right characters, wrong length
        assert!(ObjectId::parse_str("abc123").is_err());
    }
}
