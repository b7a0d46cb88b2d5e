//! Content-addressed object storage for the Vellum wiki engine.
//!
//! Pages, directory listings, and commits are all immutable objects keyed
//! by the BLAKE3 hash of their serialized form, the way git keys everything
//! under `.git/objects/`. Writing the same content twice stores it once;
//! editing a page produces a new blob, a new chain of trees up to the root,
//! and a new commit, while everything reachable from the old head stays put.
//!
//! Three typed objects layer over the raw [`StoredObject`]:
//!
//! - [`Blob`], raw page or file bytes
//! - [`Tree`], a sorted directory listing of [`TreeEntry`] values
//! - [`CommitObject`], a snapshot: root tree, optional parent, authorship
//!
//! The [`ObjectStore`] trait is the backend seam; [`InMemoryObjectStore`]
//! is the bundled implementation. The store is deliberately policy-free:
//! it never folds case, never validates page names, and never walks
//! history. All of that lives in `vellum-wiki`.

pub mod error;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectStore;
pub use object::{Blob, CommitObject, EntryMode, ObjectKind, StoredObject, Tree, TreeEntry};
pub use traits::ObjectStore;
