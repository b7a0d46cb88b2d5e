//! Content hashing for the Vellum wiki engine.
//!
//! Every object Vellum stores -- page blobs, directory trees, commits -- is
//! addressed by a BLAKE3 hash of its serialized form. Hashes are
//! domain-separated by object kind so that a blob and a commit with
//! identical bytes can never share an id.

pub mod hasher;

pub use hasher::{ContentHasher, HasherError};
