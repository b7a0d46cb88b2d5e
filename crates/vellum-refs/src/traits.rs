//! The [`RefStore`] trait defining the head reference interface.
//!
//! Any backend (in-memory, filesystem, database) implements this trait to
//! track the current head commit of a Vellum repository.

use vellum_types::ObjectId;

use crate::error::RefResult;

/// Storage backend for the repository's head reference.
///
/// Implementations must be thread-safe (`Send + Sync`). The compare-and-set
/// is the serialization point for all writers: two concurrent edits based on
/// the same observed head resolve to exactly one winner, and the loser gets
/// [`RefError::StaleHead`](crate::RefError::StaleHead).
pub trait RefStore: Send + Sync {
    /// Read the current head commit.
    ///
    /// Returns `Ok(None)` while the repository has no commits yet.
    fn head(&self) -> RefResult<Option<ObjectId>>;

    /// Unconditionally point the head at `id`.
    ///
    /// Intended for repository initialization and administrative repair;
    /// ordinary commits go through `compare_and_set_head`.
    fn set_head(&self, id: ObjectId) -> RefResult<()>;

    /// Advance the head from `expected` to `new`, atomically.
    ///
    /// Fails with `StaleHead` if the head no longer equals `expected` --
    /// i.e. another writer committed between this writer's tree read and its
    /// commit. `expected = None` asserts the repository is still unborn.
    fn compare_and_set_head(&self, expected: Option<ObjectId>, new: ObjectId) -> RefResult<()>;
}
