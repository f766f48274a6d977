use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::request::{PutObjectRequest, ServerSideEncryption};

/// Attaches server-side encryption metadata to an outgoing write.
///
/// Implementations only add fields. They never clear what was set on the
/// request before them (a canned ACL in particular).
pub trait EncryptionStrategy: Send + Sync + Debug {
    fn decorate(&self, request: &mut PutObjectRequest);
}

/// Leaves the request untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoEncryption;

impl EncryptionStrategy for NoEncryption {
    fn decorate(&self, _request: &mut PutObjectRequest) {}
}

/// KMS encryption with the provider-managed key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AwsManagedCmk;

impl EncryptionStrategy for AwsManagedCmk {
    fn decorate(&self, request: &mut PutObjectRequest) {
        request.server_side_encryption = Some(ServerSideEncryption::AwsKms);
    }
}

/// KMS encryption with a customer-supplied key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerKey {
    pub kms_key_id: String,
}

impl CustomerKey {
    pub fn new(kms_key_id: impl Into<String>) -> Self {
        Self {
            kms_key_id: kms_key_id.into(),
        }
    }
}

impl EncryptionStrategy for CustomerKey {
    fn decorate(&self, request: &mut PutObjectRequest) {
        request.server_side_encryption = Some(ServerSideEncryption::AwsKms);
        request.sse_kms_key_id = Some(self.kms_key_id.clone());
    }
}

/// Configuration form of an encryption strategy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum EncryptionSettings {
    #[default]
    None,
    AwsManaged,
    CustomerKey { key_id: String },
}

impl EncryptionSettings {
    /// Build the strategy these settings describe. `None` yields no strategy.
    pub fn strategy(&self) -> Option<Arc<dyn EncryptionStrategy>> {
        match self {
            Self::None => None,
            Self::AwsManaged => Some(Arc::new(AwsManagedCmk)),
            Self::CustomerKey { key_id } => Some(Arc::new(CustomerKey::new(key_id.clone()))),
        }
    }
}
