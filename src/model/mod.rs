//! Models - Storage-backed data for canonical CMS entities.
//!
//! Models provide a simple CRUD abstraction for storing typed data.
//! The workflow persists blocks and page associations through this layer
//! and never talks to a concrete backend directly.
//!
//! ## Example
//!
//! ```ignore
//! use cms_blocks::{Block, InMemoryModelStore, ModelsExt};
//!
//! let store = InMemoryModelStore::new();
//! store.models::<Block>().save(&block)?;
//! let loaded = store.models::<Block>().get("intro")?;
//! ```

mod in_memory;
mod model_repository;
mod store;

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// Trait for types that can be stored as models.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name for this model type (e.g., "cms_block").
    /// Maps to a table in SQL, a collection in MongoDB, a key prefix in KV stores, etc.
    const COLLECTION: &'static str;

    /// Returns the unique identifier for this model instance.
    fn id(&self) -> &str;
}

/// A versioned wrapper around model data. The version counts saves.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Error type for model store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Insert collided with an existing row.
    AlreadyExists { collection: String, id: String },
    /// Serialization/deserialization error.
    Serde(String),
    /// Storage-level error.
    Storage(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::AlreadyExists { collection, id } => {
                write!(f, "model already exists: {}:{}", collection, id)
            }
            StoreError::Serde(msg) => write!(f, "model serialization error: {}", msg),
            StoreError::Storage(msg) => write!(f, "model storage error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub use in_memory::InMemoryModelStore;
pub use model_repository::{ModelRepository, ModelsExt};
pub use store::ModelStore;
