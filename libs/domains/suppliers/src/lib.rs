//! Suppliers Domain
//!
//! Supplier records joined with the crops they own. Reads run the
//! shared owner-with-crops aggregation from the crops domain, so a
//! supplier always comes back with its city resolved and each crop
//! carrying its variant and item. Crops registered through the nested
//! route land in the shared crops collection keyed by `supplierId`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, mutate-then-refetch
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
pub use error::{SupplierError, SupplierResult};
pub use handlers::ApiDoc;
pub use models::{CreateSupplier, Supplier, UpdateSupplier};
pub use mongodb::MongoSupplierRepository;
pub use repository::SupplierRepository;
pub use service::SupplierService;
