use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use mongodb::bson::oid::ObjectId;
use tracing::instrument;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, LoginRequest, UpdateUser, User};
use crate::repository::UserRepository;

/// Business logic for users and authentication
///
/// Signups hash the password before anything touches the store; reads
/// always come back through the populated aggregation, which never
/// carries the hash.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn signup(&self, input: CreateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let hashed_password = self.hash_password(&input.password)?;
        let id = self.repository.create(input, hashed_password).await?;
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Authenticate a user and return its populated view
    ///
    /// Unknown email and wrong password both come back as
    /// [`UserError::InvalidCredentials`], so a caller cannot probe
    /// which accounts exist.
    #[instrument(skip(self, input))]
    pub async fn login(&self, input: LoginRequest) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let credentials = self
            .repository
            .find_credentials_by_email(&input.email.to_lowercase())
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(&input.password, &credentials.hashed_password)? {
            return Err(UserError::InvalidCredentials);
        }

        self.repository
            .get_by_id(credentials.id)
            .await?
            .ok_or(UserError::NotFound(credentials.id))
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: ObjectId) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.list().await
    }

    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: ObjectId, input: UpdateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        if !self.repository.update(id, input).await? {
            return Err(UserError::NotFound(id));
        }
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: ObjectId) -> UserResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(UserError::NotFound(id))
        }
    }

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordStatus, UserCredentials};
    use crate::repository::MockUserRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn sample_user(id: ObjectId) -> User {
        let now = Utc::now();
        User {
            id,
            name: "Julian".to_string(),
            surname: "Rios".to_string(),
            document_type: "CC".to_string(),
            document_number: "900123".to_string(),
            city: None,
            email: Some("julian@futuagro.test".to_string()),
            address_line1: None,
            phone_number: None,
            crops: vec![],
            role: "user".to_string(),
            record_status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_signup() -> CreateUser {
        CreateUser {
            name: "Julian".to_string(),
            surname: "Rios".to_string(),
            document_type: "CC".to_string(),
            document_number: "900123".to_string(),
            city_id: None,
            email: "julian@futuagro.test".to_string(),
            password: "secret-password".to_string(),
            address_line1: None,
            phone_number: None,
        }
    }

    fn hash_for(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_signup_hashes_before_storing() {
        let mut mock_repo = MockUserRepository::new();
        let id = ObjectId::new();

        mock_repo
            .expect_create()
            .withf(|input, hashed| {
                hashed.starts_with("$argon2") && hashed != &input.password
            })
            .returning(move |_, _| Ok(id));
        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(sample_user(id))));

        let service = UserService::new(mock_repo);
        let user = service.signup(sample_signup()).await.unwrap();

        assert_eq!(user.id, id);
    }

    #[tokio::test]
    async fn test_login_succeeds_with_the_right_password() {
        let mut mock_repo = MockUserRepository::new();
        let id = ObjectId::new();
        let hashed = hash_for("secret-password");

        mock_repo
            .expect_find_credentials_by_email()
            .withf(|email| email == "julian@futuagro.test")
            .returning(move |_| {
                Ok(Some(UserCredentials {
                    id,
                    email: "julian@futuagro.test".to_string(),
                    hashed_password: hashed.clone(),
                }))
            });
        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(sample_user(id))));

        let service = UserService::new(mock_repo);
        let user = service
            .login(LoginRequest {
                email: "Julian@Futuagro.Test".to_string(),
                password: "secret-password".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.id, id);
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_invalid_credentials() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_find_credentials_by_email()
            .returning(|_| Ok(None));

        let service = UserService::new(mock_repo);
        let result = service
            .login(LoginRequest {
                email: "nobody@futuagro.test".to_string(),
                password: "secret-password".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_indistinguishable_from_unknown_email() {
        let mut mock_repo = MockUserRepository::new();
        let id = ObjectId::new();
        let hashed = hash_for("the-real-password");

        mock_repo
            .expect_find_credentials_by_email()
            .returning(move |_| {
                Ok(Some(UserCredentials {
                    id,
                    email: "julian@futuagro.test".to_string(),
                    hashed_password: hashed.clone(),
                }))
            });

        let service = UserService::new(mock_repo);
        let result = service
            .login(LoginRequest {
                email: "julian@futuagro.test".to_string(),
                password: "a-wrong-guess".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_update_user_missing_is_not_found() {
        let mut mock_repo = MockUserRepository::new();
        let id = ObjectId::new();

        mock_repo.expect_update().returning(|_, _| Ok(false));

        let service = UserService::new(mock_repo);
        let result = service.update_user(id, UpdateUser::default()).await;

        assert!(matches!(result, Err(UserError::NotFound(found)) if found == id));
    }
}
