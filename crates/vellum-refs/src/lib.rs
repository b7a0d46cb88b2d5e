//! Head reference management for the Vellum wiki engine.
//!
//! A Vellum repository has exactly one mutable piece of state: the head
//! reference, a pointer to the commit every new edit is based on. Everything
//! else (blobs, trees, commits) is immutable once written.
//!
//! The head advances only through [`RefStore::compare_and_set_head`], which
//! succeeds only if the head still equals the value the writer observed when
//! it staged its edit. A stale head fails with [`RefError::StaleHead`] and
//! the repository is left untouched -- concurrent writers never silently
//! lose each other's commits.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{RefError, RefResult};
pub use memory::InMemoryRefStore;
pub use traits::RefStore;
