//! In-memory head reference store for testing and ephemeral use.
//!
//! [`InMemoryRefStore`] keeps the head in an `RwLock<Option<ObjectId>>`. It
//! implements the full [`RefStore`] trait and is suitable for unit tests,
//! REPL sessions, and short-lived processes.

use std::sync::RwLock;

use tracing::debug;
use vellum_types::ObjectId;

use crate::error::{RefError, RefResult};
use crate::traits::RefStore;

/// An in-memory implementation of [`RefStore`].
///
/// The head lives behind a `RwLock`. Data is lost when the store is dropped.
#[derive(Debug)]
pub struct InMemoryRefStore {
    head: RwLock<Option<ObjectId>>,
}

impl InMemoryRefStore {
    /// Create a new store with an unborn head.
    pub fn new() -> Self {
        Self {
            head: RwLock::new(None),
        }
    }
}

impl Default for InMemoryRefStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RefStore for InMemoryRefStore {
    fn head(&self) -> RefResult<Option<ObjectId>> {
        let head = self.head.read().expect("lock poisoned");
        Ok(*head)
    }

    fn set_head(&self, id: ObjectId) -> RefResult<()> {
        let mut head = self.head.write().expect("lock poisoned");
        *head = Some(id);
        Ok(())
    }

    fn compare_and_set_head(&self, expected: Option<ObjectId>, new: ObjectId) -> RefResult<()> {
        // The write lock spans the compare and the set: this is the one
        // serialized step in the whole engine.
        let mut head = self.head.write().expect("lock poisoned");
        if *head != expected {
            return Err(RefError::StaleHead {
                expected,
                actual: *head,
            });
        }
        debug!(new = %new.short_hex(), "head advanced");
        *head = Some(new);
        Ok(())
    }
}
