use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use tracing::instrument;
use validator::Validate;

use crate::error::{CropError, CropResult};
use crate::models::{CreateCrop, Crop, UpdateCrop};
use crate::repository::CropRepository;

/// Business logic for standalone crops
///
/// Writes touch only the raw document; every response goes back through
/// the populate aggregation so callers always see the joined view.
pub struct CropService<R: CropRepository> {
    repository: Arc<R>,
}

impl<R: CropRepository> CropService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_crop(&self, input: CreateCrop) -> CropResult<Crop> {
        input
            .validate()
            .map_err(|e| CropError::Validation(e.to_string()))?;

        let id = self.repository.create(input).await?;
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CropError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn get_crop(&self, id: ObjectId) -> CropResult<Crop> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CropError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_crops(&self) -> CropResult<Vec<Crop>> {
        self.repository.list().await
    }

    #[instrument(skip(self, input))]
    pub async fn update_crop(&self, id: ObjectId, input: UpdateCrop) -> CropResult<Crop> {
        input
            .validate()
            .map_err(|e| CropError::Validation(e.to_string()))?;

        if !self.repository.update(id, input).await? {
            return Err(CropError::NotFound(id));
        }
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CropError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_crop(&self, id: ObjectId) -> CropResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(CropError::NotFound(id))
        }
    }
}

impl<R: CropRepository> Clone for CropService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
