//! Error taxonomy for wiki operations.
//!
//! Absence is not an error: resolving a missing page or version yields
//! `Ok(None)`, which callers surface as a "create this page" affordance.
//! Everything here is a genuine failure.

use thiserror::Error;
use vellum_refs::RefError;
use vellum_store::StoreError;
use vellum_types::ObjectId;

/// Errors that can occur during wiki operations.
#[derive(Debug, Error)]
pub enum WikiError {
    /// A write or rename collided with an existing page whose folded name
    /// matches. The write is fully rolled back; nothing was committed.
    #[error("duplicate page: cannot write '{attempted}' in '{directory}', found existing '{existing}'")]
    DuplicatePage {
        /// Directory the collision occurred in ("" for the root).
        directory: String,
        /// The filename already occupying the slot.
        existing: String,
        /// The filename the caller tried to create.
        attempted: String,
    },

    /// The format has no registered extension mapping.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The head advanced between tree read and commit. The edit was
    /// discarded; the caller should re-read the head and retry if safe.
    #[error("conflict: head moved before commit could complete")]
    Conflict {
        /// The head this edit was based on.
        expected: Option<ObjectId>,
        /// The head found at commit time.
        actual: Option<ObjectId>,
    },

    /// Object store failure, propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Ref store failure, propagated unchanged.
    #[error(transparent)]
    Refs(#[from] RefError),
}

/// Result alias for wiki operations.
pub type WikiResult<T> = Result<T, WikiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_page_message_names_both_files() {
        let err = WikiError::DuplicatePage {
            directory: "docs".into(),
            existing: "Guide.md".into(),
            attempted: "guide.md".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Guide.md"));
        assert!(msg.contains("guide.md"));
        assert!(msg.contains("docs"));
    }

    #[test]
    fn store_errors_pass_through() {
        let inner = StoreError::NotFound(ObjectId::from_bytes(b"gone"));
        let err: WikiError = inner.into();
        assert!(err.to_string().contains("object not found"));
    }
}
