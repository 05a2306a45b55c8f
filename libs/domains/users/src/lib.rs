//! Users Domain
//!
//! User accounts with argon2 password authentication. Reads run the
//! shared owner-with-crops aggregation with the `role` field carried
//! through; the stored password hash only ever surfaces in the
//! credentials lookup backing the login flow and never reaches an API
//! response.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (users + auth)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, password hashing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └─────────────┘
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use handlers::{ApiDoc, AuthApiDoc};
pub use models::{CreateUser, LoginRequest, UpdateUser, User, UserCredentials};
pub use mongodb::MongoUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
