//! MongoDB implementations of the item and variant repositories

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, to_bson, Bson, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Collection, Database};
use tracing::instrument;

use crate::error::{ItemError, ItemResult};
use crate::models::{
    CreateItem, CreateVariant, Item, RecordStatus, UpdateItem, UpdateVariant, Variant,
};
use crate::repository::{ItemRepository, VariantRepository};

const ITEM_COLLECTION: &str = "items";
const VARIANT_COLLECTION: &str = "variants";

const WRITE_MAX_TIME: Duration = Duration::from_secs(15);

fn write_options() -> FindOneAndUpdateOptions {
    FindOneAndUpdateOptions::builder()
        .return_document(ReturnDocument::After)
        .max_time(WRITE_MAX_TIME)
        .build()
}

/// Build the $set document for a partial item update
///
/// Renames refresh the derived `lname`; `updatedAt` is always stamped.
fn build_item_update(input: &UpdateItem) -> Document {
    let mut set = Document::new();
    if let Some(name) = &input.name {
        set.insert("name", name);
        set.insert("lname", name.to_lowercase());
    }
    if let Some(status) = &input.record_status {
        set.insert("recordStatus", to_bson(status).unwrap_or(Bson::Null));
    }
    set.insert("updatedAt", chrono::Utc::now().to_rfc3339());
    set
}

fn build_variant_update(input: &UpdateVariant) -> Document {
    let mut set = Document::new();
    if let Some(name) = &input.name {
        set.insert("name", name);
        set.insert("lname", name.to_lowercase());
    }
    if let Some(status) = &input.record_status {
        set.insert("recordStatus", to_bson(status).unwrap_or(Bson::Null));
    }
    set.insert("updatedAt", chrono::Utc::now().to_rfc3339());
    set
}

/// MongoDB-backed item repository
pub struct MongoItemRepository {
    collection: Collection<Item>,
    documents: Collection<Document>,
}

impl MongoItemRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(ITEM_COLLECTION),
            documents: database.collection(ITEM_COLLECTION),
        }
    }
}

#[async_trait]
impl ItemRepository for MongoItemRepository {
    #[instrument(skip(self, input))]
    async fn create(&self, input: CreateItem) -> ItemResult<Item> {
        let now = chrono::Utc::now().to_rfc3339();
        let document = doc! {
            "name": &input.name,
            "lname": input.name.to_lowercase(),
            "createdAt": &now,
            "updatedAt": &now,
            "recordStatus": to_bson(&RecordStatus::Active).unwrap_or(Bson::Null),
        };

        let result = self.documents.insert_one(document).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| ItemError::Database("insert did not return an ObjectId".to_string()))?;

        tracing::info!(item_id = %id, "Item created");
        self.get_by_id(id)
            .await?
            .ok_or_else(|| ItemError::Database("inserted item is missing".to_string()))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> ItemResult<Option<Item>> {
        let item = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> ItemResult<Vec<Item>> {
        let mut cursor = self.collection.find(doc! {}).await?;
        let mut items = Vec::new();
        while let Some(row) = cursor.next().await {
            match row {
                Ok(item) => items.push(item),
                // One corrupt document must not fail the whole listing
                Err(error) => tracing::warn!(%error, "skipping undecodable item document"),
            }
        }
        Ok(items)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: UpdateItem) -> ItemResult<Option<Item>> {
        let set = build_item_update(&input);
        let item = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .with_options(write_options())
            .await?;
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> ItemResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

/// MongoDB-backed variant repository
pub struct MongoVariantRepository {
    collection: Collection<Variant>,
    documents: Collection<Document>,
}

impl MongoVariantRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(VARIANT_COLLECTION),
            documents: database.collection(VARIANT_COLLECTION),
        }
    }
}

#[async_trait]
impl VariantRepository for MongoVariantRepository {
    #[instrument(skip(self, input))]
    async fn create(&self, item_id: ObjectId, input: CreateVariant) -> ItemResult<Variant> {
        let now = chrono::Utc::now().to_rfc3339();
        let document = doc! {
            "name": &input.name,
            "lname": input.name.to_lowercase(),
            "itemId": item_id,
            "createdAt": &now,
            "updatedAt": &now,
            "recordStatus": to_bson(&RecordStatus::Active).unwrap_or(Bson::Null),
        };

        let result = self.documents.insert_one(document).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| ItemError::Database("insert did not return an ObjectId".to_string()))?;

        tracing::info!(variant_id = %id, item_id = %item_id, "Variant created");
        self.get_by_id(item_id, id)
            .await?
            .ok_or_else(|| ItemError::Database("inserted variant is missing".to_string()))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, item_id: ObjectId, id: ObjectId) -> ItemResult<Option<Variant>> {
        let variant = self
            .collection
            .find_one(doc! { "_id": id, "itemId": item_id })
            .await?;
        Ok(variant)
    }

    #[instrument(skip(self))]
    async fn list_by_item(&self, item_id: ObjectId) -> ItemResult<Vec<Variant>> {
        let mut cursor = self.collection.find(doc! { "itemId": item_id }).await?;
        let mut variants = Vec::new();
        while let Some(row) = cursor.next().await {
            match row {
                Ok(variant) => variants.push(variant),
                Err(error) => tracing::warn!(%error, "skipping undecodable variant document"),
            }
        }
        Ok(variants)
    }

    #[instrument(skip(self, input))]
    async fn update(
        &self,
        item_id: ObjectId,
        id: ObjectId,
        input: UpdateVariant,
    ) -> ItemResult<Option<Variant>> {
        let set = build_variant_update(&input);
        // Compound filter: a variant id with the wrong item id must not match
        let variant = self
            .collection
            .find_one_and_update(doc! { "_id": id, "itemId": item_id }, doc! { "$set": set })
            .with_options(write_options())
            .await?;
        Ok(variant)
    }

    #[instrument(skip(self))]
    async fn delete(&self, item_id: ObjectId, id: ObjectId) -> ItemResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id, "itemId": item_id })
            .await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_item_update_derives_lname_from_name() {
        let input = UpdateItem {
            name: Some("Tomato".to_string()),
            ..Default::default()
        };

        let set = build_item_update(&input);
        assert_eq!(set.get_str("name").unwrap(), "Tomato");
        assert_eq!(set.get_str("lname").unwrap(), "tomato");
        assert!(set.contains_key("updatedAt"));
    }

    #[test]
    fn test_build_item_update_without_name_leaves_lname_alone() {
        let input = UpdateItem {
            record_status: Some(RecordStatus::Inactive),
            ..Default::default()
        };

        let set = build_item_update(&input);
        assert!(!set.contains_key("name"));
        assert!(!set.contains_key("lname"));
        assert_eq!(set.get_str("recordStatus").unwrap(), "inactive");
    }

    #[test]
    fn test_build_variant_update_always_stamps_updated_at() {
        let set = build_variant_update(&UpdateVariant::default());
        assert!(set.contains_key("updatedAt"));
        assert_eq!(set.len(), 1);
    }
}
