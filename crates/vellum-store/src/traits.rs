use vellum_types::ObjectId;

use crate::error::StoreResult;
use crate::object::StoredObject;

/// Content-addressed object store.
///
/// The store is a pure hash-keyed key-value map and knows nothing about
/// wiki semantics. Page naming, collision folding, and history all live
/// above it. What it does guarantee:
///
/// - An object, once written, never changes: its id is a hash of its
///   content, so a different value would be a different id.
/// - Rewriting an existing object is a no-op, which makes retried commits
///   harmless.
/// - Reads may run concurrently with anything.
/// - Backend failures surface as errors; nothing is swallowed.
pub trait ObjectStore: Send + Sync {
    /// Fetch an object by id. `Ok(None)` means the store has never seen it.
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>>;

    /// Store an object, returning the id computed from its kind and bytes.
    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId>;

    /// Whether the store holds an object with this id.
    fn contains(&self, id: &ObjectId) -> StoreResult<bool>;
}
