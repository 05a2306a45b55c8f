use std::sync::Arc;

use domain_crops::CreateCrop;
use mongodb::bson::oid::ObjectId;
use tracing::instrument;
use validator::Validate;

use crate::error::{SupplierError, SupplierResult};
use crate::models::{CreateSupplier, Supplier, UpdateSupplier};
use crate::repository::SupplierRepository;

/// Business logic for suppliers
///
/// Every mutation re-fetches through the owner-with-crops aggregation
/// so the response is always the populated view.
pub struct SupplierService<R: SupplierRepository> {
    repository: Arc<R>,
}

impl<R: SupplierRepository> SupplierService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_supplier(&self, input: CreateSupplier) -> SupplierResult<Supplier> {
        input
            .validate()
            .map_err(|e| SupplierError::Validation(e.to_string()))?;

        let id = self.repository.create(input).await?;
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(SupplierError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn get_supplier(&self, id: ObjectId) -> SupplierResult<Supplier> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(SupplierError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_suppliers(&self) -> SupplierResult<Vec<Supplier>> {
        self.repository.list().await
    }

    #[instrument(skip(self, input))]
    pub async fn update_supplier(
        &self,
        id: ObjectId,
        input: UpdateSupplier,
    ) -> SupplierResult<Supplier> {
        input
            .validate()
            .map_err(|e| SupplierError::Validation(e.to_string()))?;

        if !self.repository.update(id, input).await? {
            return Err(SupplierError::NotFound(id));
        }
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(SupplierError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_supplier(&self, id: ObjectId) -> SupplierResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(SupplierError::NotFound(id))
        }
    }

    /// Register a crop for the supplier and return the supplier with
    /// the new crop visible in its populated crops array
    #[instrument(skip(self, input))]
    pub async fn add_crop(
        &self,
        supplier_id: ObjectId,
        input: CreateCrop,
    ) -> SupplierResult<Supplier> {
        input
            .validate()
            .map_err(|e| SupplierError::Validation(e.to_string()))?;

        match self.repository.add_crop(supplier_id, input).await? {
            Some(_) => self
                .repository
                .get_by_id(supplier_id)
                .await?
                .ok_or(SupplierError::NotFound(supplier_id)),
            None => Err(SupplierError::NotFound(supplier_id)),
        }
    }
}

impl<R: SupplierRepository> Clone for SupplierService<R> {
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
    use crate::repository::MockSupplierRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn sample_supplier(id: ObjectId) -> Supplier {
        let now = Utc::now();
        Supplier {
            id,
            name: "Maria".to_string(),
            surname: "Gomez".to_string(),
            document_type: "CC".to_string(),
            document_number: "1017245".to_string(),
            city: None,
            email: None,
            address_line1: None,
            phone_number: None,
            crops: vec![],
            record_status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_create() -> CreateSupplier {
        CreateSupplier {
            name: "Maria".to_string(),
            surname: "Gomez".to_string(),
            document_type: "CC".to_string(),
            document_number: "1017245".to_string(),
            city_id: ObjectId::new().to_hex(),
            email: None,
            address_line1: None,
            phone_number: None,
        }
    }

    fn sample_crop_input() -> CreateCrop {
        CreateCrop {
            city_id: ObjectId::new().to_hex(),
            planting_date: Utc::now(),
            harvest_date: Utc::now(),
            variant_id: None,
            supplier_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_supplier_refetches_the_populated_view() {
        let mut mock_repo = MockSupplierRepository::new();
        let id = ObjectId::new();

        mock_repo.expect_create().returning(move |_| Ok(id));
        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(sample_supplier(id))));

        let service = SupplierService::new(mock_repo);
        let supplier = service.create_supplier(sample_create()).await.unwrap();

        assert_eq!(supplier.id, id);
    }

    #[tokio::test]
    async fn test_create_supplier_rejects_invalid_email() {
        let mock_repo = MockSupplierRepository::new();
        let service = SupplierService::new(mock_repo);

        let mut input = sample_create();
        input.email = Some("not-an-email".to_string());
        let result = service.create_supplier(input).await;

        assert!(matches!(result, Err(SupplierError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_supplier_missing_is_not_found() {
        let mut mock_repo = MockSupplierRepository::new();
        let id = ObjectId::new();

        mock_repo.expect_update().returning(|_, _| Ok(false));

        let service = SupplierService::new(mock_repo);
        let result = service.update_supplier(id, UpdateSupplier::default()).await;

        assert!(matches!(result, Err(SupplierError::NotFound(found)) if found == id));
    }

    #[tokio::test]
    async fn test_add_crop_returns_the_refreshed_supplier() {
        let mut mock_repo = MockSupplierRepository::new();
        let supplier_id = ObjectId::new();
        let crop_id = ObjectId::new();

        mock_repo
            .expect_add_crop()
            .returning(move |_, _| Ok(Some(crop_id)));
        mock_repo
            .expect_get_by_id()
            .with(eq(supplier_id))
            .returning(move |_| Ok(Some(sample_supplier(supplier_id))));

        let service = SupplierService::new(mock_repo);
        let supplier = service
            .add_crop(supplier_id, sample_crop_input())
            .await
            .unwrap();

        assert_eq!(supplier.id, supplier_id);
    }

    #[tokio::test]
    async fn test_add_crop_for_missing_supplier_is_not_found() {
        let mut mock_repo = MockSupplierRepository::new();
        let supplier_id = ObjectId::new();

        mock_repo.expect_add_crop().returning(|_, _| Ok(None));

        let service = SupplierService::new(mock_repo);
        let result = service.add_crop(supplier_id, sample_crop_input()).await;

        assert!(matches!(result, Err(SupplierError::NotFound(_))));
    }
}
