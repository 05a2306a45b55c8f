//! Supplier API routes

use axum::Router;
use domain_suppliers::{handlers, MongoSupplierRepository, SupplierService};

use crate::state::AppState;

/// Create the suppliers router
pub fn router(state: &AppState) -> Router {
    let repository = MongoSupplierRepository::new(&state.db);
    let service = SupplierService::new(repository);
    handlers::router(service)
}
