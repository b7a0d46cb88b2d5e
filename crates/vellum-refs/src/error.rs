//! Error types for head reference operations.

use thiserror::Error;
use vellum_types::ObjectId;

/// Errors that can occur during head reference operations.
#[derive(Debug, Error)]
pub enum RefError {
    /// The head moved between read and commit. The caller should re-read the
    /// head and redo its edit if that is safe for its workflow.
    #[error("head moved: expected {}, found {}", fmt_head(.expected), fmt_head(.actual))]
    StaleHead {
        /// The head the writer based its edit on.
        expected: Option<ObjectId>,
        /// The head actually found at commit time.
        actual: Option<ObjectId>,
    },

    /// I/O error from a persistent ref backend.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn fmt_head(head: &Option<ObjectId>) -> String {
    match head {
        Some(id) => id.short_hex(),
        None => "(unborn)".to_string(),
    }
}

/// Convenience type alias for ref operations.
pub type RefResult<T> = std::result::Result<T, RefError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_head_message_names_both_sides() {
        let err = RefError::StaleHead {
            expected: None,
            actual: Some(ObjectId::from_bytes(b"tip")),
        };
        let msg = err.to_string();
        assert!(msg.contains("(unborn)"));
        assert!(msg.contains(&ObjectId::from_bytes(b"tip").short_hex()));
    }
}
