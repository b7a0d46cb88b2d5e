//! Resolved value objects: pages, files, and versions.
//!
//! All three are created transiently on every read or write call and never
//! cached across calls. A `Version` is decoded from a commit object and
//! never mutated after creation.

use serde::{Deserialize, Serialize};
use vellum_store::CommitObject;
use vellum_types::ObjectId;

use crate::format::PageFormat;

/// An immutable commit identifier plus its metadata.
///
/// Attached to a [`Page`] or [`WikiFile`] to record the "as-of" state it was
/// resolved against. A version has zero or one parent, forming a linear
/// history chain rooted at the initial commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// The commit identifier.
    pub id: ObjectId,
    /// Author full name.
    pub author: String,
    /// Author email address.
    pub email: String,
    /// Commit message.
    pub message: String,
    /// Wall-clock milliseconds since the UNIX epoch.
    pub timestamp_ms: u64,
    /// The previous version, or `None` for the initial commit.
    pub parent: Option<ObjectId>,
}

impl Version {
    /// Build a version from a commit id and its decoded object.
    pub fn from_commit(id: ObjectId, commit: &CommitObject) -> Self {
        Self {
            id,
            author: commit.author.clone(),
            email: commit.email.clone(),
            message: commit.message.clone(),
            timestamp_ms: commit.timestamp_ms,
            parent: commit.parent,
        }
    }
}

/// A resolved wiki page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    /// Canonical page name: the stored filename stem, case preserved.
    pub name: String,
    /// Repository-relative storage path, possibly with directory segments.
    pub path: String,
    /// The page's content format. The path extension always matches this
    /// format's registered extension.
    pub format: PageFormat,
    /// Raw page bytes, exactly as stored.
    pub data: Vec<u8>,
    /// The commit this page was resolved at. `None` only for previews
    /// against an empty repository.
    pub version: Option<Version>,
}

impl Page {
    /// The raw byte content of the page.
    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }

    /// The content as UTF-8 text, when it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

/// A resolved non-page blob (an image, an attachment).
///
/// Files resolve the same way pages do but carry no format semantics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WikiFile {
    /// The full filename, case preserved.
    pub name: String,
    /// Repository-relative storage path.
    pub path: String,
    /// Raw file bytes.
    pub data: Vec<u8>,
    /// The commit this file was resolved at.
    pub version: Option<Version>,
}
