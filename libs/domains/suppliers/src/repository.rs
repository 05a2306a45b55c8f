use async_trait::async_trait;
use domain_crops::CreateCrop;
use mongodb::bson::oid::ObjectId;

use crate::error::SupplierResult;
use crate::models::{CreateSupplier, Supplier, UpdateSupplier};

/// Data access for suppliers
///
/// Reads return the populated owner-with-crops view; writes touch the
/// raw documents only, so callers re-fetch after mutating.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupplierRepository: Send + Sync {
    /// Insert a raw supplier document, returning the new id
    async fn create(&self, input: CreateSupplier) -> SupplierResult<ObjectId>;

    /// Fetch one supplier in its populated form
    async fn get_by_id(&self, id: ObjectId) -> SupplierResult<Option<Supplier>>;

    /// List all suppliers in their populated form
    async fn list(&self) -> SupplierResult<Vec<Supplier>>;

    /// Apply a partial update; false when no supplier matched
    async fn update(&self, id: ObjectId, input: UpdateSupplier) -> SupplierResult<bool>;

    /// Delete a supplier; false when no supplier matched
    async fn delete(&self, id: ObjectId) -> SupplierResult<bool>;

    /// Register a crop owned by the supplier; None when the supplier
    /// does not exist
    async fn add_crop(
        &self,
        supplier_id: ObjectId,
        input: CreateCrop,
    ) -> SupplierResult<Option<ObjectId>>;
}
