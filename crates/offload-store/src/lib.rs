//! Object store access for payload offloading.
//!
//! This crate sits between the payload store and whatever blob store the
//! embedding application uses. It defines the capability the application must
//! supply ([`ObjectStoreClient`]), the strategies that attach server-side
//! encryption metadata to writes ([`EncryptionStrategy`]), and the data-access
//! layer ([`ObjectStoreDao`]) that maps store/fetch/delete onto client calls.
//!
//! # Clients
//!
//! - [`InMemoryObjectStoreClient`] -- `HashMap`-based client for tests and embedding
//! - [`FileSystemObjectStoreClient`] -- buckets as directories under a root
//! - `RecordingClient` -- wraps another client, counting calls and injecting failures
//!   (`test-util` feature)
//!
//! # Rules
//!
//! 1. Every DAO operation is a single blocking round-trip. Nothing is retried.
//! 2. Encryption decoration runs once, right before the write, and only adds fields.
//! 3. A canned ACL is applied independently of encryption.
//! 4. Client failures are wrapped per operation, never swallowed.

pub mod client;
pub mod dao;
pub mod encryption;
pub mod error;
pub mod fs;
pub mod memory;
#[cfg(any(test, feature = "test-util"))]
pub mod recording;
pub mod request;

pub use client::{ObjectBody, ObjectStoreClient};
pub use dao::ObjectStoreDao;
pub use encryption::{
    AwsManagedCmk, CustomerKey, EncryptionSettings, EncryptionStrategy, NoEncryption,
};
pub use error::{ClientError, ClientResult, StoreError, StoreResult};
pub use fs::{FileSystemObjectStoreClient, ObjectMetadata};
pub use memory::{InMemoryObjectStoreClient, StoredObject};
#[cfg(any(test, feature = "test-util"))]
pub use recording::RecordingClient;
pub use request::{ObjectCannedAcl, PutObjectRequest, ServerSideEncryption};
