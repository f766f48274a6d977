use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Server-side encryption mode attached to a write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServerSideEncryption {
    /// Store-managed AES-256 keys.
    #[serde(rename = "AES256")]
    Aes256,
    /// KMS-managed keys.
    #[serde(rename = "aws:kms")]
    AwsKms,
}

impl ServerSideEncryption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aes256 => "AES256",
            Self::AwsKms => "aws:kms",
        }
    }
}

impl fmt::Display for ServerSideEncryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predefined access-control policy applied to a written object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectCannedAcl {
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
    AwsExecRead,
    BucketOwnerRead,
    BucketOwnerFullControl,
}

impl ObjectCannedAcl {
    pub const ALL: [ObjectCannedAcl; 7] = [
        Self::Private,
        Self::PublicRead,
        Self::PublicReadWrite,
        Self::AuthenticatedRead,
        Self::AwsExecRead,
        Self::BucketOwnerRead,
        Self::BucketOwnerFullControl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicRead => "public-read",
            Self::PublicReadWrite => "public-read-write",
            Self::AuthenticatedRead => "authenticated-read",
            Self::AwsExecRead => "aws-exec-read",
            Self::BucketOwnerRead => "bucket-owner-read",
            Self::BucketOwnerFullControl => "bucket-owner-full-control",
        }
    }
}

impl fmt::Display for ObjectCannedAcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectCannedAcl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|acl| acl.as_str() == s)
            .ok_or_else(|| format!("unknown canned ACL: {s}"))
    }
}

/// A single object write, as handed to [`ObjectStoreClient::put_object`].
///
/// [`ObjectStoreClient::put_object`]: crate::client::ObjectStoreClient::put_object
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub body: String,
    pub server_side_encryption: Option<ServerSideEncryption>,
    pub sse_kms_key_id: Option<String>,
    pub acl: Option<ObjectCannedAcl>,
}

impl PutObjectRequest {
    /// A plain write with no encryption or ACL metadata.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            body: body.into(),
            server_side_encryption: None,
            sse_kms_key_id: None,
            acl: None,
        }
    }

    pub fn with_acl(mut self, acl: ObjectCannedAcl) -> Self {
        self.acl = Some(acl);
        self
    }

    /// Body length in bytes.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acl_strings_roundtrip() {
        for acl in ObjectCannedAcl::ALL {
            assert_eq!(acl.as_str().parse::<ObjectCannedAcl>().unwrap(), acl);
        }
    }

    #[test]
    fn unknown_acl_rejected() {
        assert!("world-writable".parse::<ObjectCannedAcl>().is_err());
    }

    #[test]
    fn acl_serde_matches_wire_string() {
        let json = serde_json::to_string(&ObjectCannedAcl::BucketOwnerFullControl).unwrap();
        assert_eq!(json, "\"bucket-owner-full-control\"");
    }

    #[test]
    fn sse_wire_strings() {
        assert_eq!(ServerSideEncryption::AwsKms.to_string(), "aws:kms");
        assert_eq!(ServerSideEncryption::Aes256.to_string(), "AES256");
        let json = serde_json::to_string(&ServerSideEncryption::AwsKms).unwrap();
        assert_eq!(json, "\"aws:kms\"");
    }

    #[test]
    fn new_request_is_plain() {
        let request = PutObjectRequest::new("b", "k", "payload");
        assert_eq!(request.content_length(), 7);
        assert!(request.server_side_encryption.is_none());
        assert!(request.sse_kms_key_id.is_none());
        assert!(request.acl.is_none());
    }
}
