//! API routes module
//!
//! Wires every domain router into the /api tree.

pub mod crops;
pub mod geo;
pub mod health;
pub mod items;
pub mod suppliers;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
/// Note: These are nested under /api by axum_helpers::create_router
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/suppliers", suppliers::router(state))
        .nest("/users", users::users_router(state))
        .nest("/auth", users::auth_router(state))
        .nest("/crops", crops::router(state))
        .nest("/items", items::router(state))
        .nest("/countries", geo::countries_router(state))
        .nest("/country-states", geo::cities_router(state))
        .merge(health::router(state.clone()))
}
