//! HTTP handlers for the suppliers API

use axum::{
    extract::State,
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
use domain_crops::CreateCrop;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::SupplierResult;
use crate::models::{CreateSupplier, Supplier, UpdateSupplier};
use crate::repository::SupplierRepository;
use crate::service::SupplierService;

/// OpenAPI documentation for the suppliers API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_suppliers,
        create_supplier,
        get_supplier,
        update_supplier,
        delete_supplier,
        add_crop
    ),
    components(
        schemas(Supplier, CreateSupplier, UpdateSupplier, CreateCrop),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestObjectIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Suppliers", description = "Supplier endpoints with populated crop views")
    )
)]
pub struct ApiDoc;

/// Create the suppliers router
pub fn router<R: SupplierRepository + 'static>(service: SupplierService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route(
            "/{id}",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
        .route("/{id}/crops", post(add_crop))
        .with_state(shared_service)
}

/// List all suppliers with their populated crops
#[utoipa::path(
    get,
    path = "",
    tag = "Suppliers",
    responses(
        (status = 200, description = "List of populated suppliers", body = Vec<Supplier>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_suppliers<R: SupplierRepository>(
    State(service): State<Arc<SupplierService<R>>>,
) -> SupplierResult<Json<Vec<Supplier>>> {
    let suppliers = service.list_suppliers().await?;
    Ok(Json(suppliers))
}

/// Create a supplier and return its populated view
#[utoipa::path(
    post,
    path = "",
    tag = "Suppliers",
    request_body = CreateSupplier,
    responses(
        (status = 201, description = "Supplier created", body = Supplier),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_supplier<R: SupplierRepository>(
    State(service): State<Arc<SupplierService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateSupplier>,
) -> SupplierResult<impl IntoResponse> {
    let supplier = service.create_supplier(input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// Get a populated supplier by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Suppliers",
    params(("id" = String, Path, description = "Supplier id")),
    responses(
        (status = 200, description = "Supplier found", body = Supplier),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_supplier<R: SupplierRepository>(
    State(service): State<Arc<SupplierService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> SupplierResult<Json<Supplier>> {
    let supplier = service.get_supplier(id).await?;
    Ok(Json(supplier))
}

/// Update a supplier; the response is re-fetched through the aggregation
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Suppliers",
    params(("id" = String, Path, description = "Supplier id")),
    request_body = UpdateSupplier,
    responses(
        (status = 200, description = "Supplier updated", body = Supplier),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_supplier<R: SupplierRepository>(
    State(service): State<Arc<SupplierService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateSupplier>,
) -> SupplierResult<Json<Supplier>> {
    let supplier = service.update_supplier(id, input).await?;
    Ok(Json(supplier))
}

/// Delete a supplier
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Suppliers",
    params(("id" = String, Path, description = "Supplier id")),
    responses(
        (status = 204, description = "Supplier deleted"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_supplier<R: SupplierRepository>(
    State(service): State<Arc<SupplierService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> SupplierResult<StatusCode> {
    service.delete_supplier(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Register a crop for a supplier
#[utoipa::path(
    post,
    path = "/{id}/crops",
    tag = "Suppliers",
    params(("id" = String, Path, description = "Supplier id")),
    request_body = CreateCrop,
    responses(
        (status = 201, description = "Crop registered, refreshed supplier returned", body = Supplier),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_crop<R: SupplierRepository>(
    State(service): State<Arc<SupplierService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<CreateCrop>,
) -> SupplierResult<impl IntoResponse> {
    let supplier = service.add_crop(id, input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}
