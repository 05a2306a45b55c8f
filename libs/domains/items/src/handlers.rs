//! HTTP handlers for the items and variants APIs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
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

use crate::error::{ItemError, ItemResult};
use crate::models::{
    CreateItem, CreateVariant, Item, RecordStatus, UpdateItem, UpdateVariant, Variant,
};
use crate::repository::{ItemRepository, VariantRepository};
use crate::service::{ItemService, VariantService};

/// OpenAPI documentation for the items and variants APIs
#[derive(OpenApi)]
#[openapi(
    paths(
        list_items,
        create_item,
        get_item,
        update_item,
        delete_item,
        list_variants,
        create_variant,
        get_variant,
        update_variant,
        delete_variant,
    ),
    components(
        schemas(
            Item, Variant, RecordStatus,
            CreateItem, UpdateItem, CreateVariant, UpdateVariant
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestObjectIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Items", description = "Catalog item endpoints"),
        (name = "Variants", description = "Variant endpoints nested under items")
    )
)]
pub struct ApiDoc;

/// Create the items router
pub fn items_router<R: ItemRepository + 'static>(service: ItemService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/{id}", get(get_item).put(update_item).delete(delete_item))
        .with_state(shared_service)
}

/// Create the variants router, mounted under /items
pub fn variants_router<R: VariantRepository + 'static>(service: VariantService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/{id}/variants",
            get(list_variants).post(create_variant),
        )
        .route(
            "/{id}/variants/{variant_id}",
            get(get_variant).put(update_variant).delete(delete_variant),
        )
        .with_state(shared_service)
}

fn parse_id(value: &str) -> ItemResult<ObjectId> {
    ObjectId::parse_str(value).map_err(|_| ItemError::Validation(format!("Invalid id: {value}")))
}

/// List all items
#[utoipa::path(
    get,
    path = "",
    tag = "Items",
    responses(
        (status = 200, description = "List of items", body = Vec<Item>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_items<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
) -> ItemResult<Json<Vec<Item>>> {
    let items = service.list_items().await?;
    Ok(Json(items))
}

/// Create a new item
#[utoipa::path(
    post,
    path = "",
    tag = "Items",
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateItem>,
) -> ItemResult<impl IntoResponse> {
    let item = service.create_item(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Get an item by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Items",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item found", body = Item),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ItemResult<Json<Item>> {
    let item = service.get_item(id).await?;
    Ok(Json(item))
}

/// Update an item; renaming also refreshes the derived lname
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Items",
    params(("id" = String, Path, description = "Item id")),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateItem>,
) -> ItemResult<Json<Item>> {
    let item = service.update_item(id, input).await?;
    Ok(Json(item))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Items",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ItemResult<StatusCode> {
    service.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the variants of an item
#[utoipa::path(
    get,
    path = "/{id}/variants",
    tag = "Variants",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "List of variants", body = Vec<Variant>),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_variants<R: VariantRepository>(
    State(service): State<Arc<VariantService<R>>>,
    ObjectIdPath(item_id): ObjectIdPath,
) -> ItemResult<Json<Vec<Variant>>> {
    let variants = service.list_variants(item_id).await?;
    Ok(Json(variants))
}

/// Create a variant under an item
#[utoipa::path(
    post,
    path = "/{id}/variants",
    tag = "Variants",
    params(("id" = String, Path, description = "Item id")),
    request_body = CreateVariant,
    responses(
        (status = 201, description = "Variant created", body = Variant),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_variant<R: VariantRepository>(
    State(service): State<Arc<VariantService<R>>>,
    ObjectIdPath(item_id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<CreateVariant>,
) -> ItemResult<impl IntoResponse> {
    let variant = service.create_variant(item_id, input).await?;
    Ok((StatusCode::CREATED, Json(variant)))
}

/// Get a variant by (item id, variant id)
#[utoipa::path(
    get,
    path = "/{id}/variants/{variant_id}",
    tag = "Variants",
    params(
        ("id" = String, Path, description = "Item id"),
        ("variant_id" = String, Path, description = "Variant id")
    ),
    responses(
        (status = 200, description = "Variant found", body = Variant),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_variant<R: VariantRepository>(
    State(service): State<Arc<VariantService<R>>>,
    Path((item_id, variant_id)): Path<(String, String)>,
) -> ItemResult<Json<Variant>> {
    let item_id = parse_id(&item_id)?;
    let variant_id = parse_id(&variant_id)?;
    let variant = service.get_variant(item_id, variant_id).await?;
    Ok(Json(variant))
}

/// Update a variant scoped by its item
#[utoipa::path(
    put,
    path = "/{id}/variants/{variant_id}",
    tag = "Variants",
    params(
        ("id" = String, Path, description = "Item id"),
        ("variant_id" = String, Path, description = "Variant id")
    ),
    request_body = UpdateVariant,
    responses(
        (status = 200, description = "Variant updated", body = Variant),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_variant<R: VariantRepository>(
    State(service): State<Arc<VariantService<R>>>,
    Path((item_id, variant_id)): Path<(String, String)>,
    ValidatedJson(input): ValidatedJson<UpdateVariant>,
) -> ItemResult<Json<Variant>> {
    let item_id = parse_id(&item_id)?;
    let variant_id = parse_id(&variant_id)?;
    let variant = service.update_variant(item_id, variant_id, input).await?;
    Ok(Json(variant))
}

/// Delete a variant scoped by its item
#[utoipa::path(
    delete,
    path = "/{id}/variants/{variant_id}",
    tag = "Variants",
    params(
        ("id" = String, Path, description = "Item id"),
        ("variant_id" = String, Path, description = "Variant id")
    ),
    responses(
        (status = 204, description = "Variant deleted"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_variant<R: VariantRepository>(
    State(service): State<Arc<VariantService<R>>>,
    Path((item_id, variant_id)): Path<(String, String)>,
) -> ItemResult<StatusCode> {
    let item_id = parse_id(&item_id)?;
    let variant_id = parse_id(&variant_id)?;
    service.delete_variant(item_id, variant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
