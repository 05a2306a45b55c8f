//! MongoDB implementation of the crop repository

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::options::AggregateOptions;
use mongodb::{Collection, Database};
use tracing::instrument;

use crate::error::{CropError, CropResult};
use crate::models::{CreateCrop, Crop, UpdateCrop};
use crate::pipeline;
use crate::repository::CropRepository;

pub const CROP_COLLECTION: &str = "crops";

/// Upper bound for one aggregation round trip
const AGGREGATE_MAX_TIME: Duration = Duration::from_secs(15);

fn aggregate_options() -> AggregateOptions {
    AggregateOptions::builder()
        .max_time(AGGREGATE_MAX_TIME)
        .build()
}

fn parse_reference(field: &str, value: &str) -> CropResult<ObjectId> {
    ObjectId::parse_str(value)
        .map_err(|_| CropError::Validation(format!("Invalid {field}: {value}")))
}

/// Build the raw insert document for a new crop
///
/// Exposed for the supplier repository, which stores owner-scoped crops
/// in the same collection.
pub fn build_crop_document(input: &CreateCrop) -> CropResult<Document> {
    let now = chrono::Utc::now().to_rfc3339();
    let mut document = doc! {
        "cityId": parse_reference("cityId", &input.city_id)?,
        "plantingDate": input.planting_date.to_rfc3339(),
        "harvestDate": input.harvest_date.to_rfc3339(),
        "createdAt": &now,
        "updatedAt": &now,
    };
    if let Some(variant_id) = &input.variant_id {
        document.insert("variantId", parse_reference("variantId", variant_id)?);
    }
    if let Some(supplier_id) = &input.supplier_id {
        document.insert("supplierId", parse_reference("supplierId", supplier_id)?);
    }
    Ok(document)
}

/// Build the $set document for a partial crop update
pub(crate) fn build_crop_update(input: &UpdateCrop) -> CropResult<Document> {
    let mut set = Document::new();
    if let Some(city_id) = &input.city_id {
        set.insert("cityId", parse_reference("cityId", city_id)?);
    }
    if let Some(planting_date) = &input.planting_date {
        set.insert("plantingDate", planting_date.to_rfc3339());
    }
    if let Some(harvest_date) = &input.harvest_date {
        set.insert("harvestDate", harvest_date.to_rfc3339());
    }
    if let Some(variant_id) = &input.variant_id {
        set.insert("variantId", parse_reference("variantId", variant_id)?);
    }
    if let Some(supplier_id) = &input.supplier_id {
        set.insert("supplierId", parse_reference("supplierId", supplier_id)?);
    }
    set.insert("updatedAt", chrono::Utc::now().to_rfc3339());
    Ok(set)
}

/// MongoDB-backed crop repository
pub struct MongoCropRepository {
    collection: Collection<Document>,
}

impl MongoCropRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(CROP_COLLECTION),
        }
    }
}

#[async_trait]
impl CropRepository for MongoCropRepository {
    #[instrument(skip(self, input))]
    async fn create(&self, input: CreateCrop) -> CropResult<ObjectId> {
        let document = build_crop_document(&input)?;
        let result = self.collection.insert_one(document).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| CropError::Database("insert did not return an ObjectId".to_string()))?;

        tracing::info!(crop_id = %id, "Crop created");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> CropResult<Option<Crop>> {
        let mut stages = vec![doc! { "$match": { "_id": id } }];
        stages.extend(pipeline::crop_populate_stages());

        let mut cursor = self
            .collection
            .aggregate(stages)
            .with_options(aggregate_options())
            .with_type::<Crop>()
            .await?;

        match cursor.next().await {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn list(&self) -> CropResult<Vec<Crop>> {
        let mut cursor = self
            .collection
            .aggregate(pipeline::crop_populate_stages())
            .with_options(aggregate_options())
            .with_type::<Crop>()
            .await?;

        let mut crops = Vec::new();
        while let Some(row) = cursor.next().await {
            match row {
                Ok(crop) => crops.push(crop),
                // One corrupt document must not fail the whole listing
                Err(error) => tracing::warn!(%error, "skipping undecodable crop document"),
            }
        }
        Ok(crops)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: UpdateCrop) -> CropResult<bool> {
        let set = build_crop_update(&input)?;
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> CropResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_build_crop_document_parses_references() {
        let city_id = ObjectId::new();
        let supplier_id = ObjectId::new();
        let input = CreateCrop {
            city_id: city_id.to_hex(),
            planting_date: Utc::now(),
            harvest_date: Utc::now(),
            variant_id: None,
            supplier_id: Some(supplier_id.to_hex()),
        };

        let document = build_crop_document(&input).unwrap();
        assert_eq!(document.get_object_id("cityId").unwrap(), city_id);
        assert_eq!(document.get_object_id("supplierId").unwrap(), supplier_id);
        assert!(!document.contains_key("variantId"));
        assert_eq!(
            document.get_str("createdAt").unwrap(),
            document.get_str("updatedAt").unwrap()
        );
    }

    #[test]
    fn test_build_crop_document_rejects_malformed_city() {
        let input = CreateCrop {
            city_id: "zzzzzzzzzzzzzzzzzzzzzzzz".to_string(),
            planting_date: Utc::now(),
            harvest_date: Utc::now(),
            variant_id: None,
            supplier_id: None,
        };

        assert!(matches!(
            build_crop_document(&input),
            Err(CropError::Validation(_))
        ));
    }

    #[test]
    fn test_build_crop_update_only_sets_supplied_fields() {
        let input = UpdateCrop {
            harvest_date: Some(Utc::now()),
            ..Default::default()
        };

        let set = build_crop_update(&input).unwrap();
        assert!(set.contains_key("harvestDate"));
        assert!(set.contains_key("updatedAt"));
        assert!(!set.contains_key("cityId"));
        assert!(!set.contains_key("plantingDate"));
        assert!(!set.contains_key("supplierId"));
    }
}
