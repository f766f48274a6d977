use thiserror::Error;

/// Errors produced while building or decoding a payload reference.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// The reference string is not a well-formed reference.
    #[error("invalid payload reference: {0}")]
    InvalidReference(String),

    #[error("bucket name must not be empty")]
    EmptyBucketName,

    #[error("object key must not be empty")]
    EmptyObjectKey,
}

/// Result alias for reference operations.
pub type ReferenceResult<T> = Result<T, ReferenceError>;
