//! Database library providing the MongoDB connector and utilities
//!
//! This library provides a unified interface for connecting to and managing
//! MongoDB connections.
//!
//! # Features
//!
//! - `config` (default) - Configuration support with `core_config::FromEnv`
//!
//! # Examples
//!
//! ```ignore
//! use database::mongodb;
//!
//! let client = mongodb::connect("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//! let collection = db.collection::<Document>("suppliers");
//! ```

// Always available modules
pub mod common;

pub mod mongodb;

// Re-exports for convenience
pub use common::{DatabaseError, DatabaseResult};
