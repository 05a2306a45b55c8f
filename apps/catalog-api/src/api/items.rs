//! Item and variant API routes

use axum::Router;
use domain_items::{
    handlers, ItemService, MongoItemRepository, MongoVariantRepository, VariantService,
};

use crate::state::AppState;

/// Create the items router with variant routes merged in
pub fn router(state: &AppState) -> Router {
    let item_service = ItemService::new(MongoItemRepository::new(&state.db));
    let variant_service = VariantService::new(MongoVariantRepository::new(&state.db));

    handlers::items_router(item_service).merge(handlers::variants_router(variant_service))
}
