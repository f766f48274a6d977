use std::io;

/// Failure reported by an object store client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The bucket does not exist.
    #[error("no such bucket: {0}")]
    NoSuchBucket(String),

    /// No object is stored under the key.
    #[error("no such key: {bucket}/{key}")]
    NoSuchKey { bucket: String, key: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Any other transport failure (network, service, credentials).
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result alias for client calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors from the object store DAO, one variant per operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The payload could not be written.
    #[error("failed to store the payload in object {bucket}/{key}: {source}")]
    Write {
        bucket: String,
        key: String,
        #[source]
        source: ClientError,
    },

    /// The object could not be fetched (missing, or the call failed).
    #[error("failed to get the object {bucket}/{key} which contains the payload: {source}")]
    Read {
        bucket: String,
        key: String,
        #[source]
        source: ClientError,
    },

    /// The object was found but its body could not be drained as text.
    #[error("failed to read the payload body of object {bucket}/{key}: {source}")]
    ReadBody {
        bucket: String,
        key: String,
        #[source]
        source: io::Error,
    },

    /// The object could not be deleted.
    #[error("failed to delete the object {bucket}/{key} which contains the payload: {source}")]
    Delete {
        bucket: String,
        key: String,
        #[source]
        source: ClientError,
    },
}

impl StoreError {
    /// Bucket the failed operation targeted.
    pub fn bucket(&self) -> &str {
        match self {
            Self::Write { bucket, .. }
            | Self::Read { bucket, .. }
            | Self::ReadBody { bucket, .. }
            | Self::Delete { bucket, .. } => bucket,
        }
    }

    /// Key the failed operation targeted.
    pub fn key(&self) -> &str {
        match self {
            Self::Write { key, .. }
            | Self::Read { key, .. }
            | Self::ReadBody { key, .. }
            | Self::Delete { key, .. } => key,
        }
    }
}

/// Result alias for DAO operations.
pub type StoreResult<T> = Result<T, StoreError>;
