use std::fmt;
use std::io::{self, Cursor, Read};
use std::sync::Arc;

use crate::error::ClientResult;
use crate::request::PutObjectRequest;

/// Body of a fetched object.
///
/// The body is a stream; draining it is left to the caller so that a failure
/// halfway through can be told apart from a failed lookup.
pub struct ObjectBody {
    reader: Box<dyn Read + Send>,
}

impl ObjectBody {
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        Self {
            reader: Box::new(reader),
        }
    }

    /// A body backed by an in-memory buffer.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(Cursor::new(bytes.into()))
    }

    /// Drain the body into a UTF-8 string.
    pub fn read_to_string(mut self) -> io::Result<String> {
        let mut text = String::new();
        self.reader.read_to_string(&mut text)?;
        Ok(text)
    }
}

impl Read for ObjectBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl fmt::Debug for ObjectBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectBody").finish_non_exhaustive()
    }
}

/// Bucket/key addressed blob store, supplied by the embedding application.
///
/// Implementations must satisfy:
/// - Each call is one round-trip. Retries, if any, belong to the client.
/// - `get_object` on a missing key is an error.
/// - `delete_object` on a missing key follows the backend's own semantics.
pub trait ObjectStoreClient: Send + Sync {
    /// Write an object, replacing any object already stored under the key.
    fn put_object(&self, request: &PutObjectRequest) -> ClientResult<()>;

    /// Open the body of the object stored under `(bucket, key)`.
    fn get_object(&self, bucket: &str, key: &str) -> ClientResult<ObjectBody>;

    /// Remove the object stored under `(bucket, key)`.
    fn delete_object(&self, bucket: &str, key: &str) -> ClientResult<()>;
}

impl<C: ObjectStoreClient + ?Sized> ObjectStoreClient for &C {
    fn put_object(&self, request: &PutObjectRequest) -> ClientResult<()> {
        (**self).put_object(request)
    }

    fn get_object(&self, bucket: &str, key: &str) -> ClientResult<ObjectBody> {
        (**self).get_object(bucket, key)
    }

    fn delete_object(&self, bucket: &str, key: &str) -> ClientResult<()> {
        (**self).delete_object(bucket, key)
    }
}

impl<C: ObjectStoreClient + ?Sized> ObjectStoreClient for Arc<C> {
    fn put_object(&self, request: &PutObjectRequest) -> ClientResult<()> {
        (**self).put_object(request)
    }

    fn get_object(&self, bucket: &str, key: &str) -> ClientResult<ObjectBody> {
        (**self).get_object(bucket, key)
    }

    fn delete_object(&self, bucket: &str, key: &str) -> ClientResult<()> {
        (**self).delete_object(bucket, key)
    }
}

impl<C: ObjectStoreClient + ?Sized> ObjectStoreClient for Box<C> {
    fn put_object(&self, request: &PutObjectRequest) -> ClientResult<()> {
        (**self).put_object(request)
    }

    fn get_object(&self, bucket: &str, key: &str) -> ClientResult<ObjectBody> {
        (**self).get_object(bucket, key)
    }

    fn delete_object(&self, bucket: &str, key: &str) -> ClientResult<()> {
        (**self).delete_object(bucket, key)
    }
}
