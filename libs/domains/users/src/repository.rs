use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::UserResult;
use crate::models::{CreateUser, UpdateUser, User, UserCredentials};

/// Data access for users
///
/// Reads return the populated owner-with-crops view (role included);
/// the credentials lookup is the only raw read and exists solely for
/// the login flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a raw user document with a pre-hashed password
    async fn create(&self, input: CreateUser, hashed_password: String) -> UserResult<ObjectId>;

    /// Fetch one user in its populated form
    async fn get_by_id(&self, id: ObjectId) -> UserResult<Option<User>>;

    /// Fetch the stored credentials for a lowercased email
    async fn find_credentials_by_email(&self, email: &str) -> UserResult<Option<UserCredentials>>;

    /// List all users in their populated form
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Apply a partial update; false when no user matched
    async fn update(&self, id: ObjectId, input: UpdateUser) -> UserResult<bool>;

    /// Delete a user; false when no user matched
    async fn delete(&self, id: ObjectId) -> UserResult<bool>;
}
