use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ReferenceError, ReferenceResult};

/// Key of an offloaded object within its bucket.
///
/// Generated keys are random (UUID v4), so two stores of identical content
/// never land on the same object.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wrap a caller-supplied key. Fails if it is empty.
    pub fn new(key: impl Into<String>) -> ReferenceResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(ReferenceError::EmptyObjectKey);
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectKey({})", self.0)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ObjectKey> for String {
    fn from(key: ObjectKey) -> Self {
        key.0
    }
}

impl TryFrom<String> for ObjectKey {
    type Error = ReferenceError;

    fn try_from(key: String) -> ReferenceResult<Self> {
        Self::new(key)
    }
}

impl TryFrom<&str> for ObjectKey {
    type Error = ReferenceError;

    fn try_from(key: &str) -> ReferenceResult<Self> {
        Self::new(key)
    }
}
