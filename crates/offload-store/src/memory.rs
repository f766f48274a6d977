use std::collections::HashMap;
use std::sync::RwLock;

use crate::client::{ObjectBody, ObjectStoreClient};
use crate::error::{ClientError, ClientResult};
use crate::request::{ObjectCannedAcl, PutObjectRequest, ServerSideEncryption};

/// An object as held by [`InMemoryObjectStoreClient`], metadata included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub body: String,
    pub server_side_encryption: Option<ServerSideEncryption>,
    pub sse_kms_key_id: Option<String>,
    pub acl: Option<ObjectCannedAcl>,
}

impl From<&PutObjectRequest> for StoredObject {
    fn from(request: &PutObjectRequest) -> Self {
        Self {
            body: request.body.clone(),
            server_side_encryption: request.server_side_encryption,
            sse_kms_key_id: request.sse_kms_key_id.clone(),
            acl: request.acl,
        }
    }
}

type Bucket = HashMap<String, StoredObject>;

/// In-memory, HashMap-based object store client.
///
/// Intended for tests and embedding. Buckets must be created before use
/// unless the client was built with [`auto_create_buckets`]. Deleting a
/// missing key from an existing bucket succeeds, as it does on S3.
///
/// [`auto_create_buckets`]: InMemoryObjectStoreClient::auto_create_buckets
pub struct InMemoryObjectStoreClient {
    buckets: RwLock<HashMap<String, Bucket>>,
    auto_create: bool,
}

impl InMemoryObjectStoreClient {
    /// Create a client with no buckets.
    pub fn new() -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            auto_create: false,
        }
    }

    /// Create a client that creates buckets on first write.
    pub fn auto_create_buckets() -> Self {
        Self {
            auto_create: true,
            ..Self::new()
        }
    }

    /// Create an empty bucket. Existing buckets are left as they are.
    pub fn create_bucket(&self, bucket: &str) {
        self.buckets
            .write()
            .expect("lock poisoned")
            .entry(bucket.to_string())
            .or_default();
    }

    /// Builder form of [`create_bucket`](Self::create_bucket).
    pub fn with_bucket(self, bucket: &str) -> Self {
        self.create_bucket(bucket);
        self
    }

    /// The object stored under `(bucket, key)`, metadata included.
    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        let buckets = self.buckets.read().expect("lock poisoned");
        buckets.get(bucket).and_then(|b| b.get(key)).cloned()
    }

    /// Number of objects across all buckets.
    pub fn len(&self) -> usize {
        self.buckets
            .read()
            .expect("lock poisoned")
            .values()
            .map(|b| b.len())
            .sum()
    }

    /// Returns `true` if no bucket holds an object.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted keys of all objects in a bucket.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let buckets = self.buckets.read().expect("lock poisoned");
        let mut keys: Vec<String> = buckets
            .get(bucket)
            .map(|b| b.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Remove every object, keeping the buckets.
    pub fn clear(&self) {
        let mut buckets = self.buckets.write().expect("lock poisoned");
        for bucket in buckets.values_mut() {
            bucket.clear();
        }
    }
}

impl Default for InMemoryObjectStoreClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStoreClient for InMemoryObjectStoreClient {
    fn put_object(&self, request: &PutObjectRequest) -> ClientResult<()> {
        let mut buckets = self.buckets.write().expect("lock poisoned");
        let bucket = if self.auto_create {
            buckets.entry(request.bucket.clone()).or_default()
        } else {
            buckets
                .get_mut(&request.bucket)
                .ok_or_else(|| ClientError::NoSuchBucket(request.bucket.clone()))?
        };
        bucket.insert(request.key.clone(), StoredObject::from(request));
        Ok(())
    }

    fn get_object(&self, bucket: &str, key: &str) -> ClientResult<ObjectBody> {
        let buckets = self.buckets.read().expect("lock poisoned");
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| ClientError::NoSuchBucket(bucket.to_string()))?;
        let object = objects.get(key).ok_or_else(|| ClientError::NoSuchKey {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })?;
        Ok(ObjectBody::from_bytes(object.body.clone().into_bytes()))
    }

    fn delete_object(&self, bucket: &str, key: &str) -> ClientResult<()> {
        let mut buckets = self.buckets.write().expect("lock poisoned");
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| ClientError::NoSuchBucket(bucket.to_string()))?;
        objects.remove(key);
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryObjectStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryObjectStoreClient")
            .field("object_count", &count)
            .field("auto_create", &self.auto_create)
            .finish()
    }
}
