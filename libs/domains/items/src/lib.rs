//! Items Domain
//!
//! Catalog items and their variants, backed by MongoDB. Both carry a
//! derived `lname` (lowercased name) maintained by the write path, and
//! every variant operation is scoped by the owning item id.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ItemError, ItemResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateItem, CreateVariant, Item, RecordStatus, UpdateItem, UpdateVariant, Variant,
};
pub use mongodb::{MongoItemRepository, MongoVariantRepository};
pub use repository::{ItemRepository, VariantRepository};
pub use service::{ItemService, VariantService};
