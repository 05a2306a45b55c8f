use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::ItemResult;
use crate::models::{CreateItem, CreateVariant, Item, UpdateItem, UpdateVariant, Variant};

/// Repository trait for Item persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a new item, deriving `lname` from the supplied name
    async fn create(&self, input: CreateItem) -> ItemResult<Item>;

    /// Get an item by id
    async fn get_by_id(&self, id: ObjectId) -> ItemResult<Option<Item>>;

    /// List all items
    async fn list(&self) -> ItemResult<Vec<Item>>;

    /// Apply a partial update; None when the id does not match
    async fn update(&self, id: ObjectId, input: UpdateItem) -> ItemResult<Option<Item>>;

    /// Hard delete; false when the id does not match
    async fn delete(&self, id: ObjectId) -> ItemResult<bool>;
}

/// Repository trait for Variant persistence
///
/// Every operation is scoped by the owning item id: a variant id with a
/// mismatched item id behaves as if the variant did not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VariantRepository: Send + Sync {
    /// Insert a new variant under the given item
    async fn create(&self, item_id: ObjectId, input: CreateVariant) -> ItemResult<Variant>;

    /// Get a variant by (item id, variant id)
    async fn get_by_id(&self, item_id: ObjectId, id: ObjectId) -> ItemResult<Option<Variant>>;

    /// List variants belonging to an item
    async fn list_by_item(&self, item_id: ObjectId) -> ItemResult<Vec<Variant>>;

    /// Apply a partial update scoped by item; None when nothing matches
    async fn update(
        &self,
        item_id: ObjectId,
        id: ObjectId,
        input: UpdateVariant,
    ) -> ItemResult<Option<Variant>>;

    /// Hard delete scoped by item; false when nothing matches
    async fn delete(&self, item_id: ObjectId, id: ObjectId) -> ItemResult<bool>;
}
