use tracing::{debug, info};

use offload_store::{ObjectStoreClient, ObjectStoreDao};
use offload_types::{ObjectKey, PayloadReference, ReferenceCodec};

use crate::config::PayloadStorageConfig;
use crate::error::{ConfigError, PayloadResult};

/// Stores payloads out of band and hands back references to them.
///
/// All implementations must satisfy these invariants:
/// - `store_payload` uses a fresh key on every call, so storing the same
///   content twice never overwrites the first object.
/// - A reference that cannot be decoded fails with
///   [`PayloadError::InvalidReference`] before any store call is made.
/// - Store failures are returned as reported; nothing is retried or hidden.
///
/// [`PayloadError::InvalidReference`]: crate::PayloadError::InvalidReference
pub trait PayloadStore: Send + Sync {
    /// Store a payload under a newly generated key and return its reference.
    fn store_payload(&self, payload: &str) -> PayloadResult<String> {
        let key = ObjectKey::generate();
        self.store_payload_with_key(payload, key.as_str())
    }

    /// Store a payload under a caller-supplied key and return its reference.
    fn store_payload_with_key(&self, payload: &str, key: &str) -> PayloadResult<String>;

    /// Fetch the payload a reference points to.
    fn fetch_payload(&self, reference: &str) -> PayloadResult<String>;

    /// Delete the payload a reference points to.
    ///
    /// The reference string itself stays valid to decode; it just points at
    /// nothing afterwards.
    fn delete_payload(&self, reference: &str) -> PayloadResult<()>;
}

/// [`PayloadStore`] backed by an object store bucket.
///
/// Holds only read-only configuration (bucket name and DAO), so one instance
/// can serve concurrent callers; thread-safety is that of the client.
pub struct ObjectStorePayloadStore<C> {
    bucket_name: String,
    dao: ObjectStoreDao<C>,
}

impl<C: ObjectStoreClient> ObjectStorePayloadStore<C> {
    /// Store payloads in `bucket_name` through `dao`.
    pub fn new(bucket_name: impl Into<String>, dao: ObjectStoreDao<C>) -> PayloadResult<Self> {
        let bucket_name = bucket_name.into();
        if bucket_name.is_empty() {
            return Err(ConfigError::EmptyBucketName.into());
        }
        Ok(Self { bucket_name, dao })
    }

    /// Build a store from an enabled configuration.
    ///
    /// The DAO gets the configured encryption strategy and canned ACL.
    pub fn from_config(config: PayloadStorageConfig<C>) -> PayloadResult<Self> {
        config.validate()?;
        let (client, settings) = config.into_parts();
        if !settings.enabled {
            return Err(ConfigError::SupportDisabled.into());
        }
        let client = client.ok_or(ConfigError::MissingClient)?;

        let mut dao = ObjectStoreDao::new(client);
        if let Some(strategy) = settings.encryption.strategy() {
            dao = dao.with_encryption(strategy);
        }
        if let Some(acl) = settings.object_canned_acl {
            dao = dao.with_canned_acl(acl);
        }
        Self::new(settings.bucket_name, dao)
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn dao(&self) -> &ObjectStoreDao<C> {
        &self.dao
    }
}

impl<C: ObjectStoreClient> PayloadStore for ObjectStorePayloadStore<C> {
    fn store_payload_with_key(&self, payload: &str, key: &str) -> PayloadResult<String> {
        let key = ObjectKey::new(key)?;
        self.dao.put_text(&self.bucket_name, key.as_str(), payload)?;

        let reference = PayloadReference::from_parts(self.bucket_name.as_str(), key)?;
        info!(
            bucket = %reference.bucket_name(),
            key = %reference.object_key(),
            len = payload.len(),
            "payload offloaded"
        );
        Ok(reference.to_reference_string())
    }

    fn fetch_payload(&self, reference: &str) -> PayloadResult<String> {
        let reference = decode(reference)?;
        let payload = self
            .dao
            .get_text(reference.bucket_name(), reference.object_key().as_str())?;
        info!(
            bucket = %reference.bucket_name(),
            key = %reference.object_key(),
            "payload fetched"
        );
        Ok(payload)
    }

    fn delete_payload(&self, reference: &str) -> PayloadResult<()> {
        let reference = decode(reference)?;
        self.dao
            .delete(reference.bucket_name(), reference.object_key().as_str())?;
        info!(
            bucket = %reference.bucket_name(),
            key = %reference.object_key(),
            "payload deleted"
        );
        Ok(())
    }
}

fn decode(reference: &str) -> PayloadResult<PayloadReference> {
    ReferenceCodec::decode(reference).map_err(|e| {
        debug!(error = %e, "rejected payload reference");
        e.into()
    })
}

impl<C> std::fmt::Debug for ObjectStorePayloadStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStorePayloadStore")
            .field("bucket_name", &self.bucket_name)
            .field("dao", &self.dao)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, PayloadError};
    use offload_store::{
        ClientError, EncryptionSettings, InMemoryObjectStoreClient, ObjectCannedAcl,
        RecordingClient, ServerSideEncryption, StoreError,
    };
    use offload_types::ReferenceError;

    const BUCKET: &str = "test-bucket-name";
    const ANY_KEY: &str = "AnyS3key";
    const ANY_PAYLOAD: &str = "AnyPayload";

    type Client = RecordingClient<InMemoryObjectStoreClient>;

    fn store() -> ObjectStorePayloadStore<Client> {
        let client = RecordingClient::new(InMemoryObjectStoreClient::new().with_bucket(BUCKET));
        ObjectStorePayloadStore::new(BUCKET, ObjectStoreDao::new(client)).unwrap()
    }

    fn client(store: &ObjectStorePayloadStore<Client>) -> &Client {
        store.dao().client()
    }

    // -----------------------------------------------------------------------
    // Store
    // -----------------------------------------------------------------------

    #[test]
    fn store_payload_returns_reference_to_generated_key() {
        let store = store();
        let reference = store.store_payload(ANY_PAYLOAD).unwrap();

        let put = client(&store).last_put().unwrap();
        assert_eq!(put.bucket, BUCKET);
        assert_eq!(put.body, ANY_PAYLOAD);
        assert_eq!(reference, ReferenceCodec::encode(BUCKET, &put.key));
        assert_eq!(client(&store).put_calls(), 1);
    }

    #[test]
    fn store_payload_with_key_uses_that_key() {
        let store = store();
        let reference = store.store_payload_with_key(ANY_PAYLOAD, ANY_KEY).unwrap();

        assert_eq!(reference, ReferenceCodec::encode(BUCKET, ANY_KEY));
        assert_eq!(client(&store).last_put().unwrap().key, ANY_KEY);
    }

    #[test]
    fn store_payload_always_creates_new_objects() {
        let store = store();
        let first = store.store_payload(ANY_PAYLOAD).unwrap();
        let second = store.store_payload(ANY_PAYLOAD).unwrap();

        let puts = client(&store).puts();
        assert_eq!(puts.len(), 2);
        assert_ne!(puts[0].key, puts[1].key);
        assert_ne!(first, second);
        assert_eq!(client(&store).inner().keys(BUCKET).len(), 2);
    }

    #[test]
    fn store_failure_returns_dao_error_and_no_reference() {
        let store = store();
        client(&store).fail_puts_with(|| ClientError::Transport("S3 exception".into()));

        let err = store.store_payload(ANY_PAYLOAD).unwrap_err();
        match err {
            PayloadError::Store(StoreError::Write { bucket, source, .. }) => {
                assert_eq!(bucket, BUCKET);
                assert!(matches!(source, ClientError::Transport(ref m) if m == "S3 exception"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_key_rejected_without_store_call() {
        let store = store();
        let err = store.store_payload_with_key(ANY_PAYLOAD, "").unwrap_err();
        assert!(matches!(
            err,
            PayloadError::InvalidReference(ReferenceError::EmptyObjectKey)
        ));
        assert_eq!(client(&store).total_calls(), 0);
    }

    // -----------------------------------------------------------------------
    // Fetch
    // -----------------------------------------------------------------------

    #[test]
    fn fetch_uses_bucket_and_key_from_reference() {
        let store = store();
        let reference = store.store_payload_with_key(ANY_PAYLOAD, ANY_KEY).unwrap();
        assert_eq!(store.fetch_payload(&reference).unwrap(), ANY_PAYLOAD);
        assert_eq!(client(&store).get_calls(), 1);
    }

    #[test]
    fn fetch_follows_reference_to_other_bucket() {
        let inner = InMemoryObjectStoreClient::new()
            .with_bucket(BUCKET)
            .with_bucket("elsewhere");
        let store =
            ObjectStorePayloadStore::new(BUCKET, ObjectStoreDao::new(RecordingClient::new(inner)))
                .unwrap();
        store
            .dao()
            .put_text("elsewhere", "k", "from another bucket")
            .unwrap();

        let reference = ReferenceCodec::encode("elsewhere", "k");
        assert_eq!(store.fetch_payload(&reference).unwrap(), "from another bucket");
    }

    #[test]
    fn fetch_incorrect_reference_makes_no_store_call() {
        let store = store();
        let err = store.fetch_payload("IncorrectPointer").unwrap_err();
        assert!(matches!(err, PayloadError::InvalidReference(_)));
        assert_eq!(client(&store).get_calls(), 0);
        assert_eq!(client(&store).total_calls(), 0);
    }

    #[test]
    fn fetch_failure_is_returned_verbatim() {
        let store = store();
        client(&store).fail_gets_with(|| ClientError::Transport("S3 exception".into()));
        let reference = ReferenceCodec::encode(BUCKET, ANY_KEY);

        let err = store.fetch_payload(&reference).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::Store(StoreError::Read { source: ClientError::Transport(_), .. })
        ));
    }

    #[test]
    fn fetch_missing_object_is_read_error() {
        let store = store();
        let reference = ReferenceCodec::encode(BUCKET, "never-stored");
        let err = store.fetch_payload(&reference).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::Store(StoreError::Read { source: ClientError::NoSuchKey { .. }, .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    #[test]
    fn delete_removes_object() {
        let store = store();
        let reference = store.store_payload_with_key(ANY_PAYLOAD, ANY_KEY).unwrap();
        store.delete_payload(&reference).unwrap();

        assert_eq!(client(&store).delete_calls(), 1);
        assert!(client(&store).inner().object(BUCKET, ANY_KEY).is_none());
        // The reference now dangles.
        assert!(matches!(
            store.fetch_payload(&reference),
            Err(PayloadError::Store(StoreError::Read { .. }))
        ));
    }

    #[test]
    fn delete_incorrect_reference_makes_no_store_call() {
        let store = store();
        let err = store.delete_payload("IncorrectPointer").unwrap_err();
        assert!(matches!(err, PayloadError::InvalidReference(_)));
        assert_eq!(client(&store).delete_calls(), 0);
    }

    #[test]
    fn delete_absent_object_reports_what_client_reports() {
        let store = store();
        store
            .delete_payload(&ReferenceCodec::encode(BUCKET, "never-stored"))
            .unwrap();

        client(&store).fail_deletes_with(|| ClientError::Transport("access denied".into()));
        let err = store
            .delete_payload(&ReferenceCodec::encode(BUCKET, "never-stored"))
            .unwrap_err();
        assert!(matches!(err, PayloadError::Store(StoreError::Delete { .. })));
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn new_rejects_empty_bucket() {
        let dao = ObjectStoreDao::new(InMemoryObjectStoreClient::new());
        let err = ObjectStorePayloadStore::new("", dao).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::Configuration(ConfigError::EmptyBucketName)
        ));
    }

    #[test]
    fn from_config_applies_encryption_and_acl() {
        let recording = RecordingClient::new(InMemoryObjectStoreClient::new().with_bucket(BUCKET));
        let config = PayloadStorageConfig::new()
            .with_encryption(EncryptionSettings::CustomerKey { key_id: "customer-key".into() })
            .with_object_canned_acl(ObjectCannedAcl::BucketOwnerFullControl)
            .with_payload_support_enabled(recording, BUCKET)
            .unwrap();
        let store = ObjectStorePayloadStore::from_config(config).unwrap();
        assert_eq!(store.bucket_name(), BUCKET);

        store.store_payload(ANY_PAYLOAD).unwrap();
        let put = client(&store).last_put().unwrap();
        assert_eq!(put.server_side_encryption, Some(ServerSideEncryption::AwsKms));
        assert_eq!(put.sse_kms_key_id.as_deref(), Some("customer-key"));
        assert_eq!(put.acl, Some(ObjectCannedAcl::BucketOwnerFullControl));
    }

    #[test]
    fn from_config_without_encryption_leaves_fields_empty() {
        let recording = RecordingClient::new(InMemoryObjectStoreClient::new().with_bucket(BUCKET));
        let config = PayloadStorageConfig::new()
            .with_payload_support_enabled(recording, BUCKET)
            .unwrap();
        let store = ObjectStorePayloadStore::from_config(config).unwrap();

        store.store_payload(ANY_PAYLOAD).unwrap();
        let put = client(&store).last_put().unwrap();
        assert!(put.server_side_encryption.is_none());
        assert!(put.sse_kms_key_id.is_none());
        assert!(put.acl.is_none());
    }

    #[test]
    fn from_disabled_config_fails() {
        let config = PayloadStorageConfig::<InMemoryObjectStoreClient>::new();
        let err = ObjectStorePayloadStore::from_config(config).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::Configuration(ConfigError::SupportDisabled)
        ));

        let config = PayloadStorageConfig::new()
            .with_payload_support_enabled(InMemoryObjectStoreClient::new(), BUCKET)
            .unwrap()
            .with_payload_support_disabled();
        assert!(ObjectStorePayloadStore::from_config(config).is_err());
    }

    #[test]
    fn store_is_usable_as_trait_object() {
        let store: Box<dyn PayloadStore> = Box::new(store());
        let reference = store.store_payload(ANY_PAYLOAD).unwrap();
        assert_eq!(store.fetch_payload(&reference).unwrap(), ANY_PAYLOAD);
    }
}
