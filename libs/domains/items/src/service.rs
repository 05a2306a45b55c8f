use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use tracing::instrument;
use validator::Validate;

use crate::error::{ItemError, ItemResult};
use crate::models::{CreateItem, CreateVariant, Item, UpdateItem, UpdateVariant, Variant};
use crate::repository::{ItemRepository, VariantRepository};

/// Business logic for items
pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_item(&self, input: CreateItem) -> ItemResult<Item> {
        input
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;
        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: ObjectId) -> ItemResult<Item> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ItemError::ItemNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_items(&self) -> ItemResult<Vec<Item>> {
        self.repository.list().await
    }

    #[instrument(skip(self, input))]
    pub async fn update_item(&self, id: ObjectId, input: UpdateItem) -> ItemResult<Item> {
        input
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;
        self.repository
            .update(id, input)
            .await?
            .ok_or(ItemError::ItemNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: ObjectId) -> ItemResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(ItemError::ItemNotFound(id))
        }
    }
}

impl<R: ItemRepository> Clone for ItemService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

/// Business logic for variants, always scoped by the owning item
pub struct VariantService<R: VariantRepository> {
    repository: Arc<R>,
}

impl<R: VariantRepository> VariantService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_variant(
        &self,
        item_id: ObjectId,
        input: CreateVariant,
    ) -> ItemResult<Variant> {
        input
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;
        self.repository.create(item_id, input).await
    }

    #[instrument(skip(self))]
    pub async fn get_variant(&self, item_id: ObjectId, id: ObjectId) -> ItemResult<Variant> {
        self.repository
            .get_by_id(item_id, id)
            .await?
            .ok_or(ItemError::VariantNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_variants(&self, item_id: ObjectId) -> ItemResult<Vec<Variant>> {
        self.repository.list_by_item(item_id).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_variant(
        &self,
        item_id: ObjectId,
        id: ObjectId,
        input: UpdateVariant,
    ) -> ItemResult<Variant> {
        input
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;
        self.repository
            .update(item_id, id, input)
            .await?
            .ok_or(ItemError::VariantNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_variant(&self, item_id: ObjectId, id: ObjectId) -> ItemResult<()> {
        if self.repository.delete(item_id, id).await? {
            Ok(())
        } else {
            Err(ItemError::VariantNotFound(id))
        }
    }
}

impl<R: VariantRepository> Clone for VariantService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordStatus;
    use crate::repository::{MockItemRepository, MockVariantRepository};
    use chrono::Utc;
    use mockall::predicate::eq;

    fn sample_variant(item_id: ObjectId, id: ObjectId) -> Variant {
        let now = Utc::now();
        Variant {
            id,
            name: "Roma".to_string(),
            lname: "roma".to_string(),
            item_id,
            item: None,
            created_at: now,
            updated_at: now,
            record_status: RecordStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_get_item_maps_missing_to_not_found() {
        let mut mock_repo = MockItemRepository::new();
        let id = ObjectId::new();

        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let service = ItemService::new(mock_repo);
        let result = service.get_item(id).await;

        assert!(matches!(result, Err(ItemError::ItemNotFound(found)) if found == id));
    }

    #[tokio::test]
    async fn test_create_item_rejects_empty_name_before_store_access() {
        let mock_repo = MockItemRepository::new();
        let service = ItemService::new(mock_repo);

        let result = service
            .create_item(CreateItem {
                name: String::new(),
            })
            .await;

        assert!(matches!(result, Err(ItemError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_variant_with_mismatched_item_is_not_found() {
        let mut mock_repo = MockVariantRepository::new();
        let wrong_item_id = ObjectId::new();
        let variant_id = ObjectId::new();

        // The repository scopes by item id, so a mismatch yields None
        mock_repo
            .expect_get_by_id()
            .with(eq(wrong_item_id), eq(variant_id))
            .returning(|_, _| Ok(None));

        let service = VariantService::new(mock_repo);
        let result = service.get_variant(wrong_item_id, variant_id).await;

        assert!(matches!(result, Err(ItemError::VariantNotFound(found)) if found == variant_id));
    }

    #[tokio::test]
    async fn test_create_variant_attaches_item_reference() {
        let mut mock_repo = MockVariantRepository::new();
        let item_id = ObjectId::new();
        let variant_id = ObjectId::new();

        mock_repo
            .expect_create()
            .with(eq(item_id), mockall::predicate::always())
            .returning(move |item, _| Ok(sample_variant(item, variant_id)));

        let service = VariantService::new(mock_repo);
        let variant = service
            .create_variant(
                item_id,
                CreateVariant {
                    name: "Roma".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(variant.item_id, item_id);
        assert_eq!(variant.lname, "roma");
    }

    #[tokio::test]
    async fn test_delete_variant_missing_is_not_found() {
        let mut mock_repo = MockVariantRepository::new();
        let item_id = ObjectId::new();
        let variant_id = ObjectId::new();

        mock_repo
            .expect_delete()
            .with(eq(item_id), eq(variant_id))
            .returning(|_, _| Ok(false));

        let service = VariantService::new(mock_repo);
        let result = service.delete_variant(item_id, variant_id).await;

        assert!(matches!(result, Err(ItemError::VariantNotFound(_))));
    }
}
