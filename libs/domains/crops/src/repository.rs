use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::CropResult;
use crate::models::{CreateCrop, Crop, UpdateCrop};

/// Repository trait for the standalone crop collection
///
/// Reads go through the populate aggregation; writes operate on the raw
/// document and return only enough for the service to re-fetch the
/// populated view (insert-then-refetch).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CropRepository: Send + Sync {
    /// Insert a raw crop document and return its generated id
    async fn create(&self, input: CreateCrop) -> CropResult<ObjectId>;

    /// Get one populated crop view
    async fn get_by_id(&self, id: ObjectId) -> CropResult<Option<Crop>>;

    /// List all populated crop views
    async fn list(&self) -> CropResult<Vec<Crop>>;

    /// Apply a partial update to the raw document; false when the id
    /// does not match
    async fn update(&self, id: ObjectId, input: UpdateCrop) -> CropResult<bool>;

    /// Hard delete; false when the id does not match
    async fn delete(&self, id: ObjectId) -> CropResult<bool>;
}
