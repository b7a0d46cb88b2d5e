use vellum_types::ObjectId;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A tree or commit pointed at an object the store does not hold.
    /// Reachable objects are immutable, so this indicates corruption or a
    /// partially copied repository, not a normal miss.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// An object failed to encode or decode.
    #[error("codec failure: {0}")]
    Codec(String),

    /// The object's bytes do not match its kind tag.
    #[error("corrupt object {id}: {reason}")]
    CorruptObject { id: ObjectId, reason: String },

    /// Refused to store an object hashing to the null id.
    #[error("cannot store object with null ID")]
    NullObjectId,

    /// I/O failure in the underlying backend, propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
