//! HTTP handlers for the crops API

use axum::{
    extract::State,
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
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CropResult;
use crate::models::{CreateCrop, Crop, CropOwner, UpdateCrop};
use crate::repository::CropRepository;
use crate::service::CropService;

/// OpenAPI documentation for the crops API
#[derive(OpenApi)]
#[openapi(
    paths(list_crops, create_crop, get_crop, update_crop, delete_crop),
    components(
        schemas(Crop, CropOwner, CreateCrop, UpdateCrop),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestObjectIdResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Crops", description = "Standalone crop endpoints with populated views")
    )
)]
pub struct ApiDoc;

/// Create the crops router
pub fn router<R: CropRepository + 'static>(service: CropService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_crops).post(create_crop))
        .route("/{id}", get(get_crop).put(update_crop).delete(delete_crop))
        .with_state(shared_service)
}

/// List all crops with their populated views
#[utoipa::path(
    get,
    path = "",
    tag = "Crops",
    responses(
        (status = 200, description = "List of populated crops", body = Vec<Crop>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_crops<R: CropRepository>(
    State(service): State<Arc<CropService<R>>>,
) -> CropResult<Json<Vec<Crop>>> {
    let crops = service.list_crops().await?;
    Ok(Json(crops))
}

/// Create a crop and return its populated view
#[utoipa::path(
    post,
    path = "",
    tag = "Crops",
    request_body = CreateCrop,
    responses(
        (status = 201, description = "Crop created", body = Crop),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_crop<R: CropRepository>(
    State(service): State<Arc<CropService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateCrop>,
) -> CropResult<impl IntoResponse> {
    let crop = service.create_crop(input).await?;
    Ok((StatusCode::CREATED, Json(crop)))
}

/// Get a populated crop by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Crops",
    params(("id" = String, Path, description = "Crop id")),
    responses(
        (status = 200, description = "Crop found", body = Crop),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_crop<R: CropRepository>(
    State(service): State<Arc<CropService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CropResult<Json<Crop>> {
    let crop = service.get_crop(id).await?;
    Ok(Json(crop))
}

/// Update a crop; the response is re-fetched through the aggregation
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Crops",
    params(("id" = String, Path, description = "Crop id")),
    request_body = UpdateCrop,
    responses(
        (status = 200, description = "Crop updated", body = Crop),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_crop<R: CropRepository>(
    State(service): State<Arc<CropService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateCrop>,
) -> CropResult<Json<Crop>> {
    let crop = service.update_crop(id, input).await?;
    Ok(Json(crop))
}

/// Delete a crop
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Crops",
    params(("id" = String, Path, description = "Crop id")),
    responses(
        (status = 204, description = "Crop deleted"),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_crop<R: CropRepository>(
    State(service): State<Arc<CropService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CropResult<StatusCode> {
    service.delete_crop(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
