//! Pointer-based payload store.
//!
//! Messaging systems cap message size. When a payload is too large (or the
//! caller always offloads), the calling layer hands the body to a
//! [`PayloadStore`], which writes it to an object store and returns a small
//! reference string. The reference travels in place of the body and is later
//! used to fetch or delete it.
//!
//! Deciding *when* to offload is left to the caller; the threshold and
//! "always" flag in [`PayloadStorageSettings`] are carried for it.
//!
//! # Example
//!
//! ```rust
//! use offload_payload::{ObjectStorePayloadStore, PayloadStorageConfig, PayloadStore};
//! use offload_store::InMemoryObjectStoreClient;
//!
//! let client = InMemoryObjectStoreClient::new().with_bucket("payloads");
//! let config = PayloadStorageConfig::new()
//!     .with_payload_support_enabled(client, "payloads")
//!     .unwrap();
//! let store = ObjectStorePayloadStore::from_config(config).unwrap();
//!
//! let reference = store.store_payload("a very large body").unwrap();
//! assert_eq!(store.fetch_payload(&reference).unwrap(), "a very large body");
//! store.delete_payload(&reference).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod store;

pub use config::{PayloadStorageConfig, PayloadStorageSettings, DEFAULT_PAYLOAD_SIZE_THRESHOLD};
pub use error::{ConfigError, PayloadError, PayloadResult};
pub use store::{ObjectStorePayloadStore, PayloadStore};

// Re-export key types
pub use offload_store::{
    EncryptionSettings, EncryptionStrategy, ObjectCannedAcl, ObjectStoreClient, ObjectStoreDao,
};
pub use offload_types::{ObjectKey, PayloadReference, ReferenceCodec};
