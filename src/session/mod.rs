//! Sessions and the session-backed draft slot.
//!
//! The workflow never talks to a real session implementation: it reads
//! request-scoped variables from [`Session`] and stages in-flight blocks
//! through [`DraftStore`], which persists into whatever [`SessionBackend`]
//! the host provides.

mod draft;

pub use draft::DraftStore;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::model::StoreError;

/// Per-client session: an identifier plus a bag of string variables.
#[derive(Debug, Clone, Default)]
pub struct Session {
    id: String,
    variables: HashMap<String, String>,
}

impl Session {
    /// Create an empty, anonymous session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with the given identifier.
    pub fn with_id(id: impl Into<String>) -> Self {
        Session {
            id: id.into(),
            variables: HashMap::new(),
        }
    }

    /// Create a session from an identifier and a map of variables.
    pub fn from_map(id: impl Into<String>, variables: HashMap<String, String>) -> Self {
        Session {
            id: id.into(),
            variables,
        }
    }

    /// The session identifier. Draft slots are keyed by it.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get a session variable by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|v| v.as_str())
    }

    /// Set a session variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Check if a session variable exists.
    pub fn has(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    /// Get all session variables.
    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }
}

/// Narrow contract over whatever session storage the host provides.
///
/// Values are opaque strings; concurrency guarantees are whatever the
/// backend itself offers.
pub trait SessionBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    /// Returns true if the key existed.
    fn remove(&self, key: &str) -> Result<bool, StoreError>;
}

/// In-memory session backend backed by `Arc<RwLock<HashMap>>`.
///
/// Clone-friendly (cloning shares the same underlying storage).
#[derive(Clone)]
pub struct InMemorySessionBackend {
    storage: Arc<RwLock<HashMap<String, String>>>,
}

impl Default for InMemorySessionBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionBackend {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl SessionBackend for InMemorySessionBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
        Ok(storage.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
        storage.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
        Ok(storage.remove(key).is_some())
    }
}
