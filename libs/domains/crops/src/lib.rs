//! Crops Domain
//!
//! The standalone crop collection and the shared aggregation pipeline
//! builders. A crop references a city, a variant (which references an
//! item) and an owning supplier or user; the read path resolves those
//! references into one populated view. The `pipeline` module is also
//! consumed by the supplier and user repositories for their
//! owner-with-crops views, so the join logic exists exactly once.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, insert-then-refetch
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Pipeline   │  ← Shared aggregation stage builders
//! └─────────────┘
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod pipeline;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CropError, CropResult};
pub use handlers::ApiDoc;
pub use models::{CreateCrop, Crop, CropOwner, UpdateCrop};
pub use mongodb::MongoCropRepository;
pub use repository::CropRepository;
pub use service::CropService;
