//! MongoDB implementation of the supplier repository

use std::time::Duration;

use async_trait::async_trait;
use domain_crops::pipeline::owner_with_crops_stages;
use domain_crops::CreateCrop;
use futures_util::StreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, to_bson, Bson, Document};
use mongodb::options::AggregateOptions;
use mongodb::{Collection, Database};
use tracing::instrument;

use crate::error::{SupplierError, SupplierResult};
use crate::models::{CreateSupplier, Supplier, UpdateSupplier};
use crate::repository::SupplierRepository;

const SUPPLIER_COLLECTION: &str = "suppliers";

const AGGREGATE_MAX_TIME: Duration = Duration::from_secs(15);

fn aggregate_options() -> AggregateOptions {
    AggregateOptions::builder()
        .max_time(AGGREGATE_MAX_TIME)
        .build()
}

fn parse_city_reference(value: &str) -> SupplierResult<ObjectId> {
    ObjectId::parse_str(value)
        .map_err(|_| SupplierError::Validation(format!("Invalid cityId: {value}")))
}

/// Build the raw insert document for a new supplier
pub(crate) fn build_supplier_document(input: &CreateSupplier) -> SupplierResult<Document> {
    let now = chrono::Utc::now().to_rfc3339();
    let mut document = doc! {
        "name": &input.name,
        "surname": &input.surname,
        "documentType": &input.document_type,
        "documentNumber": &input.document_number,
        "cityId": parse_city_reference(&input.city_id)?,
        "createdAt": &now,
        "updatedAt": &now,
        "recordStatus": "active",
    };
    if let Some(email) = &input.email {
        document.insert("email", email);
    }
    if let Some(address_line1) = &input.address_line1 {
        document.insert("addressLine1", address_line1);
    }
    if let Some(phone_number) = &input.phone_number {
        document.insert("phoneNumber", phone_number);
    }
    Ok(document)
}

/// Build the $set document for a partial supplier update
pub(crate) fn build_supplier_update(input: &UpdateSupplier) -> SupplierResult<Document> {
    let mut set = Document::new();
    if let Some(name) = &input.name {
        set.insert("name", name);
    }
    if let Some(surname) = &input.surname {
        set.insert("surname", surname);
    }
    if let Some(document_type) = &input.document_type {
        set.insert("documentType", document_type);
    }
    if let Some(document_number) = &input.document_number {
        set.insert("documentNumber", document_number);
    }
    if let Some(city_id) = &input.city_id {
        set.insert("cityId", parse_city_reference(city_id)?);
    }
    if let Some(email) = &input.email {
        set.insert("email", email);
    }
    if let Some(address_line1) = &input.address_line1 {
        set.insert("addressLine1", address_line1);
    }
    if let Some(phone_number) = &input.phone_number {
        set.insert("phoneNumber", phone_number);
    }
    if let Some(status) = &input.record_status {
        set.insert("recordStatus", to_bson(status).unwrap_or(Bson::Null));
    }
    set.insert("updatedAt", chrono::Utc::now().to_rfc3339());
    Ok(set)
}

/// MongoDB-backed supplier repository
///
/// Owner-scoped crops live in the shared crops collection keyed by
/// `supplierId`, so the populated view comes out of the same pipeline
/// the standalone crop reads use.
pub struct MongoSupplierRepository {
    suppliers: Collection<Document>,
    crops: Collection<Document>,
}

impl MongoSupplierRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            suppliers: database.collection(SUPPLIER_COLLECTION),
            crops: database.collection(domain_crops::mongodb::CROP_COLLECTION),
        }
    }
}

#[async_trait]
impl SupplierRepository for MongoSupplierRepository {
    #[instrument(skip(self, input))]
    async fn create(&self, input: CreateSupplier) -> SupplierResult<ObjectId> {
        let document = build_supplier_document(&input)?;
        let result = self.suppliers.insert_one(document).await?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            SupplierError::Database("insert did not return an ObjectId".to_string())
        })?;

        tracing::info!(supplier_id = %id, "Supplier created");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> SupplierResult<Option<Supplier>> {
        let mut stages = vec![doc! { "$match": { "_id": id } }];
        stages.extend(owner_with_crops_stages(false));

        let mut cursor = self
            .suppliers
            .aggregate(stages)
            .with_options(aggregate_options())
            .with_type::<Supplier>()
            .await?;

        match cursor.next().await {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn list(&self) -> SupplierResult<Vec<Supplier>> {
        let mut cursor = self
            .suppliers
            .aggregate(owner_with_crops_stages(false))
            .with_options(aggregate_options())
            .with_type::<Supplier>()
            .await?;

        let mut suppliers = Vec::new();
        while let Some(row) = cursor.next().await {
            match row {
                Ok(supplier) => suppliers.push(supplier),
                // One corrupt document must not fail the whole listing
                Err(error) => tracing::warn!(%error, "skipping undecodable supplier document"),
            }
        }
        Ok(suppliers)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: UpdateSupplier) -> SupplierResult<bool> {
        let set = build_supplier_update(&input)?;
        let result = self
            .suppliers
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> SupplierResult<bool> {
        let result = self.suppliers.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self, input))]
    async fn add_crop(
        &self,
        supplier_id: ObjectId,
        input: CreateCrop,
    ) -> SupplierResult<Option<ObjectId>> {
        let exists = self
            .suppliers
            .find_one(doc! { "_id": supplier_id })
            .await?
            .is_some();
        if !exists {
            return Ok(None);
        }

        let mut document = domain_crops::mongodb::build_crop_document(&input)
            .map_err(|e| SupplierError::Validation(e.to_string()))?;
        // The owner comes from the route, never from the payload
        document.insert("supplierId", supplier_id);

        let result = self.crops.insert_one(document).await?;
        let crop_id = result.inserted_id.as_object_id().ok_or_else(|| {
            SupplierError::Database("insert did not return an ObjectId".to_string())
        })?;

        tracing::info!(supplier_id = %supplier_id, crop_id = %crop_id, "Crop registered for supplier");
        Ok(Some(crop_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordStatus;

    #[test]
    fn test_build_supplier_document_parses_city_reference() {
        let city_id = ObjectId::new();
        let input = CreateSupplier {
            name: "Maria".to_string(),
            surname: "Gomez".to_string(),
            document_type: "CC".to_string(),
            document_number: "1017245".to_string(),
            city_id: city_id.to_hex(),
            email: Some("maria@futuagro.test".to_string()),
            address_line1: None,
            phone_number: None,
        };

        let document = build_supplier_document(&input).unwrap();
        assert_eq!(document.get_object_id("cityId").unwrap(), city_id);
        assert_eq!(document.get_str("recordStatus").unwrap(), "active");
        assert!(document.contains_key("email"));
        assert!(!document.contains_key("addressLine1"));
    }

    #[test]
    fn test_build_supplier_document_rejects_malformed_city() {
        let input = CreateSupplier {
            name: "Maria".to_string(),
            surname: "Gomez".to_string(),
            document_type: "CC".to_string(),
            document_number: "1017245".to_string(),
            city_id: "not-a-hex-id".to_string(),
            email: None,
            address_line1: None,
            phone_number: None,
        };

        assert!(matches!(
            build_supplier_document(&input),
            Err(SupplierError::Validation(_))
        ));
    }

    #[test]
    fn test_build_supplier_update_only_sets_supplied_fields() {
        let input = UpdateSupplier {
            phone_number: Some("3015550134".to_string()),
            record_status: Some(RecordStatus::Inactive),
            ..Default::default()
        };

        let set = build_supplier_update(&input).unwrap();
        assert!(set.contains_key("phoneNumber"));
        assert_eq!(set.get_str("recordStatus").unwrap(), "inactive");
        assert!(set.contains_key("updatedAt"));
        assert!(!set.contains_key("name"));
        assert!(!set.contains_key("cityId"));
    }
}
