//! MongoDB implementation of the user repository

use std::time::Duration;

use async_trait::async_trait;
use domain_crops::pipeline::owner_with_crops_stages;
use futures_util::StreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, to_bson, Bson, Document};
use mongodb::options::AggregateOptions;
use mongodb::{Collection, Database};
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserCredentials};
use crate::repository::UserRepository;

const USER_COLLECTION: &str = "users";

/// Role stamped on every signup
const DEFAULT_ROLE: &str = "user";

const AGGREGATE_MAX_TIME: Duration = Duration::from_secs(15);

fn aggregate_options() -> AggregateOptions {
    AggregateOptions::builder()
        .max_time(AGGREGATE_MAX_TIME)
        .build()
}

fn parse_city_reference(value: &str) -> UserResult<ObjectId> {
    ObjectId::parse_str(value)
        .map_err(|_| UserError::Validation(format!("Invalid cityId: {value}")))
}

/// Build the raw insert document for a new user
///
/// The email is lowercased so the login lookup can match it exactly.
pub(crate) fn build_user_document(
    input: &CreateUser,
    hashed_password: &str,
) -> UserResult<Document> {
    let now = chrono::Utc::now().to_rfc3339();
    let mut document = doc! {
        "name": &input.name,
        "surname": &input.surname,
        "documentType": &input.document_type,
        "documentNumber": &input.document_number,
        "email": input.email.to_lowercase(),
        "hashedPassword": hashed_password,
        "role": DEFAULT_ROLE,
        "createdAt": &now,
        "updatedAt": &now,
        "recordStatus": "active",
    };
    if let Some(city_id) = &input.city_id {
        document.insert("cityId", parse_city_reference(city_id)?);
    }
    if let Some(address_line1) = &input.address_line1 {
        document.insert("addressLine1", address_line1);
    }
    if let Some(phone_number) = &input.phone_number {
        document.insert("phoneNumber", phone_number);
    }
    Ok(document)
}

/// Build the $set document for a partial user update
pub(crate) fn build_user_update(input: &UpdateUser) -> UserResult<Document> {
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
        set.insert("email", email.to_lowercase());
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

/// MongoDB-backed user repository
pub struct MongoUserRepository {
    documents: Collection<Document>,
    credentials: Collection<UserCredentials>,
}

impl MongoUserRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            documents: database.collection(USER_COLLECTION),
            credentials: database.collection(USER_COLLECTION),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, input, hashed_password))]
    async fn create(&self, input: CreateUser, hashed_password: String) -> UserResult<ObjectId> {
        let document = build_user_document(&input, &hashed_password)?;
        let result = self.documents.insert_one(document).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| UserError::Database("insert did not return an ObjectId".to_string()))?;

        tracing::info!(user_id = %id, "User created");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> UserResult<Option<User>> {
        let mut stages = vec![doc! { "$match": { "_id": id } }];
        stages.extend(owner_with_crops_stages(true));

        let mut cursor = self
            .documents
            .aggregate(stages)
            .with_options(aggregate_options())
            .with_type::<User>()
            .await?;

        match cursor.next().await {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, email))]
    async fn find_credentials_by_email(&self, email: &str) -> UserResult<Option<UserCredentials>> {
        let found = self.credentials.find_one(doc! { "email": email }).await?;
        Ok(found)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> UserResult<Vec<User>> {
        let mut cursor = self
            .documents
            .aggregate(owner_with_crops_stages(true))
            .with_options(aggregate_options())
            .with_type::<User>()
            .await?;

        let mut users = Vec::new();
        while let Some(row) = cursor.next().await {
            match row {
                Ok(user) => users.push(user),
                // One corrupt document must not fail the whole listing
                Err(error) => tracing::warn!(%error, "skipping undecodable user document"),
            }
        }
        Ok(users)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: ObjectId, input: UpdateUser) -> UserResult<bool> {
        let set = build_user_update(&input)?;
        let result = self
            .documents
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> UserResult<bool> {
        let result = self.documents.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordStatus;

    fn sample_create() -> CreateUser {
        CreateUser {
            name: "Julian".to_string(),
            surname: "Rios".to_string(),
            document_type: "CC".to_string(),
            document_number: "900123".to_string(),
            city_id: None,
            email: "Julian@Futuagro.Test".to_string(),
            password: "secret-password".to_string(),
            address_line1: None,
            phone_number: None,
        }
    }

    #[test]
    fn test_build_user_document_lowercases_email_and_stamps_role() {
        let document = build_user_document(&sample_create(), "$argon2id$stub").unwrap();

        assert_eq!(document.get_str("email").unwrap(), "julian@futuagro.test");
        assert_eq!(document.get_str("role").unwrap(), "user");
        assert_eq!(document.get_str("hashedPassword").unwrap(), "$argon2id$stub");
        assert!(!document.contains_key("cityId"));
        assert!(!document.contains_key("password"));
    }

    #[test]
    fn test_build_user_document_rejects_malformed_city() {
        let mut input = sample_create();
        input.city_id = Some("nope".to_string());

        assert!(matches!(
            build_user_document(&input, "$argon2id$stub"),
            Err(UserError::Validation(_))
        ));
    }

    #[test]
    fn test_build_user_update_only_sets_supplied_fields() {
        let input = UpdateUser {
            email: Some("New@Mail.Test".to_string()),
            record_status: Some(RecordStatus::Inactive),
            ..Default::default()
        };

        let set = build_user_update(&input).unwrap();
        assert_eq!(set.get_str("email").unwrap(), "new@mail.test");
        assert_eq!(set.get_str("recordStatus").unwrap(), "inactive");
        assert!(set.contains_key("updatedAt"));
        assert!(!set.contains_key("name"));
        assert!(!set.contains_key("hashedPassword"));
    }
}
