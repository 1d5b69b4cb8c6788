//! DraftStore — the one uncommitted block a session may hold.

use std::sync::Arc;

use crate::block::Block;
use crate::model::StoreError;

use super::{InMemorySessionBackend, SessionBackend};

/// Fixed slot name for the in-flight block. One slot per session.
const DRAFT_SLOT: &str = "new-block";

/// Session-scoped staging area for not-yet-persisted blocks.
///
/// Each session holds at most one draft; a new creation attempt replaces
/// the previous draft (last writer wins), and a successful commit clears
/// the slot. Drafts die with the session — nothing was persisted, so no
/// compensation is needed.
#[derive(Clone)]
pub struct DraftStore {
    backend: Arc<dyn SessionBackend>,
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftStore {
    /// Draft store over an in-memory session backend.
    pub fn new() -> Self {
        Self::with_backend(Arc::new(InMemorySessionBackend::new()))
    }

    /// Draft store over a host-provided session backend.
    pub fn with_backend(backend: Arc<dyn SessionBackend>) -> Self {
        Self { backend }
    }

    fn slot_key(session_id: &str) -> String {
        format!("{}:{}", session_id, DRAFT_SLOT)
    }

    /// Stage a draft, replacing any existing one for the session.
    pub fn put(&self, session_id: &str, block: &Block) -> Result<(), StoreError> {
        let serialized =
            serde_json::to_string(block).map_err(|e| StoreError::Serde(e.to_string()))?;
        self.backend.set(&Self::slot_key(session_id), serialized)
    }

    /// The session's staged draft, if any.
    pub fn get(&self, session_id: &str) -> Result<Option<Block>, StoreError> {
        match self.backend.get(&Self::slot_key(session_id))? {
            Some(serialized) => serde_json::from_str(&serialized)
                .map(Some)
                .map_err(|e| StoreError::Serde(e.to_string())),
            None => Ok(None),
        }
    }

    /// Drop the session's draft. Returns true if one was staged.
    pub fn clear(&self, session_id: &str) -> Result<bool, StoreError> {
        self.backend.remove(&Self::slot_key(session_id))
    }
}
