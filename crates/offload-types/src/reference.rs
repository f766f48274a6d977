use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{ReferenceError, ReferenceResult};
use crate::key::ObjectKey;

/// Version of the reference wire format produced by [`ReferenceCodec`].
///
/// The version is a property of the codec, not of the string: version 1 emits
/// exactly the two members below and nothing else.
pub const REFERENCE_FORMAT_VERSION: u32 = 1;

const BUCKET_NAME_FIELD: &str = "s3BucketName";
const OBJECT_KEY_FIELD: &str = "s3Key";

/// Location of an offloaded payload: the bucket it lives in and its key.
///
/// A reference is immutable once built. The store holds no registry of the
/// references it hands out; deleting the payload leaves any copies of the
/// reference string dangling.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PayloadReference {
    bucket_name: String,
    object_key: ObjectKey,
}

impl PayloadReference {
    /// Build a reference, rejecting an empty bucket name or key.
    pub fn new(
        bucket_name: impl Into<String>,
        object_key: impl Into<String>,
    ) -> ReferenceResult<Self> {
        let bucket_name = bucket_name.into();
        if bucket_name.is_empty() {
            return Err(ReferenceError::EmptyBucketName);
        }
        let object_key = ObjectKey::new(object_key)?;
        Ok(Self {
            bucket_name,
            object_key,
        })
    }

    /// Build a reference from an already validated key.
    pub fn from_parts(
        bucket_name: impl Into<String>,
        object_key: ObjectKey,
    ) -> ReferenceResult<Self> {
        let bucket_name = bucket_name.into();
        if bucket_name.is_empty() {
            return Err(ReferenceError::EmptyBucketName);
        }
        Ok(Self {
            bucket_name,
            object_key,
        })
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn object_key(&self) -> &ObjectKey {
        &self.object_key
    }

    /// Encode into the transportable reference string.
    pub fn to_reference_string(&self) -> String {
        ReferenceCodec::encode(&self.bucket_name, self.object_key.as_str())
    }

    pub fn into_parts(self) -> (String, ObjectKey) {
        (self.bucket_name, self.object_key)
    }
}

impl fmt::Display for PayloadReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_reference_string())
    }
}

impl FromStr for PayloadReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> ReferenceResult<Self> {
        ReferenceCodec::decode(s)
    }
}

/// Codec between a [`PayloadReference`] and its wire string.
///
/// The encoding is written out member by member rather than derived, so the
/// wire shape cannot drift with the Rust type:
///
/// ```text
/// {"s3BucketName":"<bucket>","s3Key":"<key>"}
/// ```
pub struct ReferenceCodec;

impl ReferenceCodec {
    /// Encode a bucket and key into a reference string.
    pub fn encode(bucket_name: &str, object_key: &str) -> String {
        let mut map = Map::with_capacity(2);
        map.insert(BUCKET_NAME_FIELD.to_string(), Value::String(bucket_name.to_string()));
        map.insert(OBJECT_KEY_FIELD.to_string(), Value::String(object_key.to_string()));
        Value::Object(map).to_string()
    }

    /// Decode a reference string.
    ///
    /// Fails with [`ReferenceError::InvalidReference`] if the string is not a
    /// JSON object, or if either member is missing, not a string, or empty.
    /// Unknown members are ignored.
    pub fn decode(reference: &str) -> ReferenceResult<PayloadReference> {
        let value: Value = serde_json::from_str(reference)
            .map_err(|e| ReferenceError::InvalidReference(format!("not valid JSON: {e}")))?;
        let Value::Object(map) = value else {
            return Err(ReferenceError::InvalidReference(
                "expected a JSON object".into(),
            ));
        };
        let bucket_name = required_field(&map, BUCKET_NAME_FIELD)?;
        let object_key = required_field(&map, OBJECT_KEY_FIELD)?;
        PayloadReference::new(bucket_name, object_key)
    }
}

fn required_field<'a>(map: &'a Map<String, Value>, name: &str) -> ReferenceResult<&'a str> {
    match map.get(name) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        Some(Value::String(_)) => Err(ReferenceError::InvalidReference(format!(
            "member `{name}` is empty"
        ))),
        Some(_) => Err(ReferenceError::InvalidReference(format!(
            "member `{name}` is not a string"
        ))),
        None => Err(ReferenceError::InvalidReference(format!(
            "missing member `{name}`"
        ))),
    }
}
