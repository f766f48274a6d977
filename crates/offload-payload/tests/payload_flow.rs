//! End-to-end store / fetch / delete through the shipped clients.

use std::sync::Arc;
use std::thread;

use offload_payload::{
    ObjectStorePayloadStore, PayloadError, PayloadReference, PayloadStorageConfig,
    PayloadStorageSettings, PayloadStore,
};
use offload_store::{
    FileSystemObjectStoreClient, InMemoryObjectStoreClient, ObjectCannedAcl, RecordingClient,
    ServerSideEncryption, StoreError,
};

const BUCKET: &str = "offload-bucket";

fn fs_store(root: &std::path::Path) -> ObjectStorePayloadStore<FileSystemObjectStoreClient> {
    let client = FileSystemObjectStoreClient::open(root).unwrap();
    client.create_bucket(BUCKET).unwrap();
    let config = PayloadStorageConfig::new()
        .with_payload_support_enabled(client, BUCKET)
        .unwrap();
    ObjectStorePayloadStore::from_config(config).unwrap()
}

#[test]
fn filesystem_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let store = fs_store(dir.path());
    let payload = "x".repeat(300 * 1024);

    let reference = store.store_payload(&payload).unwrap();
    let parsed: PayloadReference = reference.parse().unwrap();
    assert_eq!(parsed.bucket_name(), BUCKET);

    assert_eq!(store.fetch_payload(&reference).unwrap(), payload);

    store.delete_payload(&reference).unwrap();
    let err = store.fetch_payload(&reference).unwrap_err();
    assert!(matches!(err, PayloadError::Store(StoreError::Read { .. })));

    // Deleting again is what the filesystem client says it is: a no-op.
    store.delete_payload(&reference).unwrap();
}

#[test]
fn references_survive_a_new_store_instance() {
    let dir = tempfile::tempdir().unwrap();
    let reference = fs_store(dir.path())
        .store_payload_with_key("persisted body", "k1")
        .unwrap();

    let reopened = fs_store(dir.path());
    assert_eq!(reopened.fetch_payload(&reference).unwrap(), "persisted body");
}

#[test]
fn settings_file_drives_decoration() {
    let dir = tempfile::tempdir().unwrap();
    let settings = PayloadStorageSettings::from_toml_str(&format!(
        r#"
        enabled = true
        bucket_name = "{BUCKET}"
        object_canned_acl = "private"

        [encryption]
        mode = "aws-managed"
        "#
    ))
    .unwrap();

    let client = FileSystemObjectStoreClient::open(dir.path()).unwrap();
    client.create_bucket(BUCKET).unwrap();
    let config = PayloadStorageConfig::from_settings(settings).with_client(client.clone());
    let store = ObjectStorePayloadStore::from_config(config).unwrap();

    let reference: PayloadReference = store.store_payload("body").unwrap().parse().unwrap();
    let meta = client
        .metadata(BUCKET, reference.object_key().as_str())
        .unwrap();
    assert_eq!(meta.server_side_encryption, Some(ServerSideEncryption::AwsKms));
    assert!(meta.sse_kms_key_id.is_none());
    assert_eq!(meta.acl, Some(ObjectCannedAcl::Private));
}

#[test]
fn settings_enabled_without_client_is_rejected() {
    let settings = PayloadStorageSettings {
        enabled: true,
        bucket_name: BUCKET.into(),
        ..Default::default()
    };
    let config = PayloadStorageConfig::<InMemoryObjectStoreClient>::from_settings(settings);
    let err = ObjectStorePayloadStore::from_config(config).unwrap_err();
    assert!(matches!(err, PayloadError::Configuration(_)));
}

#[test]
fn concurrent_callers_share_one_store() {
    let client = RecordingClient::new(InMemoryObjectStoreClient::new().with_bucket(BUCKET));
    let config = PayloadStorageConfig::new()
        .with_payload_support_enabled(client, BUCKET)
        .unwrap();
    let store = Arc::new(ObjectStorePayloadStore::from_config(config).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..25 {
                    let reference = store.store_payload("same content").unwrap();
                    assert_eq!(store.fetch_payload(&reference).unwrap(), "same content");
                }
                25usize
            })
        })
        .collect();
    let stored: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(stored, 200);
    let client = store.dao().client();
    assert_eq!(client.put_calls(), 200);
    assert_eq!(client.get_calls(), 200);
    assert_eq!(client.inner().keys(BUCKET).len(), 200);
}

#[test]
fn malformed_references_never_reach_the_client() {
    let client = RecordingClient::new(InMemoryObjectStoreClient::new().with_bucket(BUCKET));
    let config = PayloadStorageConfig::new()
        .with_payload_support_enabled(client, BUCKET)
        .unwrap();
    let store = ObjectStorePayloadStore::from_config(config).unwrap();

    for bad in [
        "not a valid reference",
        "",
        "{}",
        r#"{"s3BucketName":"b"}"#,
        r#"{"s3BucketName":"","s3Key":"k"}"#,
        r#"["b","k"]"#,
    ] {
        assert!(matches!(store.fetch_payload(bad), Err(PayloadError::InvalidReference(_))));
        assert!(matches!(store.delete_payload(bad), Err(PayloadError::InvalidReference(_))));
    }
    assert_eq!(store.dao().client().total_calls(), 0);
}
