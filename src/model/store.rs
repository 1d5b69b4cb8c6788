//! ModelStore - Abstract CRUD storage for models.

use super::{Model, StoreError, Versioned};

/// Abstract CRUD storage for models.
pub trait ModelStore: Send + Sync {
    /// Get a model by ID. Returns None if not found.
    fn get_model<M: Model>(&self, id: &str) -> Result<Option<Versioned<M>>, StoreError>;

    /// Upsert a model (insert or update).
    fn save_model<M: Model>(&self, model: &M) -> Result<Versioned<M>, StoreError>;

    /// Insert a new model. Fails if it already exists.
    fn insert_model<M: Model>(&self, model: &M) -> Result<Versioned<M>, StoreError>;

    /// Delete a model by ID. Returns true if it existed.
    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, StoreError>;

    /// Find models matching a predicate.
    fn find_models<M: Model>(
        &self,
        predicate: &dyn Fn(&M) -> bool,
    ) -> Result<Vec<Versioned<M>>, StoreError>;
}
