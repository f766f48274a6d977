use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use offload_store::{EncryptionSettings, ObjectCannedAcl};

use crate::error::ConfigError;

/// Default offload threshold in bytes (256 KiB).
pub const DEFAULT_PAYLOAD_SIZE_THRESHOLD: usize = 256 * 1024;

/// Serializable payload storage settings, loadable from TOML.
///
/// ```toml
/// enabled = true
/// bucket_name = "offload-bucket"
/// payload_size_threshold = 262144
/// always_through_store = false
/// object_canned_acl = "bucket-owner-full-control"
///
/// [encryption]
/// mode = "customer-key"
/// key_id = "alias/my-key"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PayloadStorageSettings {
    /// Whether payloads may be offloaded at all.
    pub enabled: bool,
    /// Bucket that offloaded payloads are written to.
    pub bucket_name: String,
    /// Size above which the calling layer offloads a payload.
    pub payload_size_threshold: usize,
    /// When `true`, the calling layer offloads every payload regardless of size.
    pub always_through_store: bool,
    /// Canned ACL attached to writes.
    pub object_canned_acl: Option<ObjectCannedAcl>,
    /// Server-side encryption attached to writes.
    pub encryption: EncryptionSettings,
}

impl Default for PayloadStorageSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            bucket_name: String::new(),
            payload_size_threshold: DEFAULT_PAYLOAD_SIZE_THRESHOLD,
            always_through_store: false,
            object_canned_acl: None,
            encryption: EncryptionSettings::None,
        }
    }
}

impl PayloadStorageSettings {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Payload storage configuration: settings plus the object store client.
///
/// The value is immutable once built. Enabling or disabling payload support
/// consumes the configuration and returns a new one; a store built from a
/// configuration is unaffected by later changes to another value.
#[derive(Clone)]
pub struct PayloadStorageConfig<C> {
    client: Option<C>,
    settings: PayloadStorageSettings,
}

impl<C> PayloadStorageConfig<C> {
    /// A configuration with payload support disabled.
    pub fn new() -> Self {
        Self::from_settings(PayloadStorageSettings::default())
    }

    /// Wrap loaded settings. A client must still be attached with
    /// [`with_client`](Self::with_client) if the settings enable support.
    pub fn from_settings(settings: PayloadStorageSettings) -> Self {
        Self {
            client: None,
            settings,
        }
    }

    /// Enable payload support with the given client and bucket.
    pub fn with_payload_support_enabled(
        self,
        client: C,
        bucket_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let bucket_name = bucket_name.into();
        if bucket_name.is_empty() {
            warn!("refusing to enable payload support without a bucket name");
            return Err(ConfigError::EmptyBucketName);
        }
        if self.settings.enabled {
            warn!("payload support is already enabled; replacing client and bucket name");
        }
        info!(bucket = %bucket_name, "payload support enabled");
        Ok(Self {
            client: Some(client),
            settings: PayloadStorageSettings {
                enabled: true,
                bucket_name,
                ..self.settings
            },
        })
    }

    /// Disable payload support, dropping the client and bucket name.
    pub fn with_payload_support_disabled(self) -> Self {
        info!("payload support disabled");
        Self {
            client: None,
            settings: PayloadStorageSettings {
                enabled: false,
                bucket_name: String::new(),
                ..self.settings
            },
        }
    }

    pub fn with_client(mut self, client: C) -> Self {
        self.client = Some(client);
        self
    }

    pub fn with_payload_size_threshold(mut self, threshold: usize) -> Self {
        self.settings.payload_size_threshold = threshold;
        self
    }

    pub fn with_always_through_store(mut self, always: bool) -> Self {
        self.settings.always_through_store = always;
        self
    }

    pub fn with_encryption(mut self, encryption: EncryptionSettings) -> Self {
        self.settings.encryption = encryption;
        self
    }

    pub fn with_object_canned_acl(mut self, acl: ObjectCannedAcl) -> Self {
        self.settings.object_canned_acl = Some(acl);
        self
    }

    /// Check that an enabled configuration has a client and a bucket.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.settings.enabled {
            return Ok(());
        }
        if self.client.is_none() {
            return Err(ConfigError::MissingClient);
        }
        if self.settings.bucket_name.is_empty() {
            return Err(ConfigError::EmptyBucketName);
        }
        Ok(())
    }

    pub fn is_payload_support_enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn bucket_name(&self) -> &str {
        &self.settings.bucket_name
    }

    pub fn payload_size_threshold(&self) -> usize {
        self.settings.payload_size_threshold
    }

    pub fn is_always_through_store(&self) -> bool {
        self.settings.always_through_store
    }

    pub fn encryption(&self) -> &EncryptionSettings {
        &self.settings.encryption
    }

    pub fn object_canned_acl(&self) -> Option<ObjectCannedAcl> {
        self.settings.object_canned_acl
    }

    pub fn client(&self) -> Option<&C> {
        self.client.as_ref()
    }

    pub fn settings(&self) -> &PayloadStorageSettings {
        &self.settings
    }

    pub fn into_parts(self) -> (Option<C>, PayloadStorageSettings) {
        (self.client, self.settings)
    }
}

impl<C> Default for PayloadStorageConfig<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for PayloadStorageConfig<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadStorageConfig")
            .field("has_client", &self.client.is_some())
            .field("settings", &self.settings)
            .finish()
    }
}
