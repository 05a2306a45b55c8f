//! Standalone crop API routes

use axum::Router;
use domain_crops::{handlers, CropService, MongoCropRepository};

use crate::state::AppState;

/// Create the crops router
pub fn router(state: &AppState) -> Router {
    let repository = MongoCropRepository::new(&state.db);
    let service = CropService::new(repository);
    handlers::router(service)
}
