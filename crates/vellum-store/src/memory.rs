use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;
use vellum_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// In-memory object store, for tests and embedding.
///
/// A `RwLock<HashMap>` keyed by content address. Everything is lost on drop;
/// a persistent wiki would put a disk-backed implementation of
/// [`ObjectStore`] behind the same trait.
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<ObjectId, StoredObject>>,
}

impl InMemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of distinct objects held.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Whether the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        Ok(self.objects.read().expect("lock poisoned").get(id).cloned())
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        if id.is_null() {
            return Err(StoreError::NullObjectId);
        }
        let mut objects = self.objects.write().expect("lock poisoned");
        if !objects.contains_key(&id) {
            debug!(id = %id.short_hex(), kind = %object.kind, size = object.size, "stored object");
            objects.insert(id, object.clone());
        }
        Ok(id)
    }

    fn contains(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.objects.read().expect("lock poisoned").contains_key(id))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.len())
            .finish()
    }
}
