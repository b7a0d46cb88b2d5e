//! Line-level content diff for the Vellum wiki engine.
//!
//! Compares two revisions of a page's raw bytes and produces structured
//! hunks with context lines, for "compare versions" views. Built on the
//! `similar` crate (Myers diff algorithm). Binary content degrades to a
//! synthetic one-hunk summary rather than a line diff.

pub mod blob_diff;

pub use blob_diff::{diff_blobs, BlobDiff, DiffHunk, DiffLine};
