use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::client::ObjectStoreClient;
use crate::encryption::EncryptionStrategy;
use crate::error::{StoreError, StoreResult};
use crate::request::{ObjectCannedAcl, PutObjectRequest};

/// Data-access layer over an [`ObjectStoreClient`].
///
/// Turns text store/fetch/delete into client calls, attaches the configured
/// canned ACL and encryption metadata to writes, and wraps client failures in
/// the [`StoreError`] variant for the operation. Every method is a single
/// round-trip; nothing is retried.
pub struct ObjectStoreDao<C> {
    client: C,
    encryption: Option<Arc<dyn EncryptionStrategy>>,
    canned_acl: Option<ObjectCannedAcl>,
}

impl<C: ObjectStoreClient> ObjectStoreDao<C> {
    /// A DAO that writes without encryption or ACL metadata.
    pub fn new(client: C) -> Self {
        Self {
            client,
            encryption: None,
            canned_acl: None,
        }
    }

    pub fn with_encryption(mut self, strategy: Arc<dyn EncryptionStrategy>) -> Self {
        self.encryption = Some(strategy);
        self
    }

    pub fn with_canned_acl(mut self, acl: ObjectCannedAcl) -> Self {
        self.canned_acl = Some(acl);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn encryption(&self) -> Option<&Arc<dyn EncryptionStrategy>> {
        self.encryption.as_ref()
    }

    pub fn canned_acl(&self) -> Option<ObjectCannedAcl> {
        self.canned_acl
    }

    /// Write `content` to `(bucket, key)`.
    pub fn put_text(&self, bucket: &str, key: &str, content: &str) -> StoreResult<()> {
        let mut request = PutObjectRequest::new(bucket, key, content);
        if let Some(acl) = self.canned_acl {
            request.acl = Some(acl);
        }
        if let Some(strategy) = &self.encryption {
            strategy.decorate(&mut request);
        }

        debug!(bucket, key, len = content.len(), "putting payload object");
        self.client.put_object(&request).map_err(|source| {
            warn!(bucket, key, error = %source, "failed to store payload object");
            StoreError::Write {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source,
            }
        })?;
        info!(bucket, key, "payload object created");
        Ok(())
    }

    /// Read the full object at `(bucket, key)` as text.
    pub fn get_text(&self, bucket: &str, key: &str) -> StoreResult<String> {
        debug!(bucket, key, "getting payload object");
        let body = self.client.get_object(bucket, key).map_err(|source| {
            warn!(bucket, key, error = %source, "failed to get payload object");
            StoreError::Read {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source,
            }
        })?;

        let text = body.read_to_string().map_err(|source| {
            warn!(bucket, key, error = %source, "failed to drain payload object body");
            StoreError::ReadBody {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source,
            }
        })?;
        info!(bucket, key, len = text.len(), "payload object read");
        Ok(text)
    }

    /// Remove the object at `(bucket, key)`.
    pub fn delete(&self, bucket: &str, key: &str) -> StoreResult<()> {
        debug!(bucket, key, "deleting payload object");
        self.client.delete_object(bucket, key).map_err(|source| {
            warn!(bucket, key, error = %source, "failed to delete payload object");
            StoreError::Delete {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source,
            }
        })?;
        info!(bucket, key, "payload object deleted");
        Ok(())
    }
}

impl<C> std::fmt::Debug for ObjectStoreDao<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreDao")
            .field("encryption", &self.encryption)
            .field("canned_acl", &self.canned_acl)
            .finish_non_exhaustive()
    }
}
