use std::io;

use thiserror::Error;

/// Errors raised while building or loading payload storage configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("object store client must be provided when payload support is enabled")]
    MissingClient,

    #[error("bucket name must not be empty when payload support is enabled")]
    EmptyBucketName,

    #[error("payload support is disabled")]
    SupportDisabled,

    #[error("invalid configuration: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum PayloadError {
    /// The reference could not be decoded. No store call was made.
    #[error(transparent)]
    InvalidReference(#[from] offload_types::ReferenceError),

    /// The object store operation failed, as reported by the DAO.
    #[error(transparent)]
    Store(#[from] offload_store::StoreError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

pub type PayloadResult<T> = Result<T, PayloadError>;
