//! Foundation types for payload offloading.
//!
//! A payload that is too large to travel inline with a message is written to
//! an object store, and the message carries a small *reference* instead. This
//! crate defines that reference and the codec that turns it into the string
//! handed to callers. Every other offload crate depends on `offload-types`.
//!
//! # Key Types
//!
//! - [`PayloadReference`] — the `(bucket, key)` location of an offloaded payload
//! - [`ReferenceCodec`] — encodes a reference into its wire string and back
//! - [`ObjectKey`] — object key, randomly generated unless supplied by the caller
//!
//! # Wire Format
//!
//! A reference string is a JSON object with exactly two members:
//!
//! ```text
//! {"s3BucketName":"<bucket>","s3Key":"<key>"}
//! ```
//!
//! Unknown members are ignored on decode and never emitted.

pub mod error;
pub mod key;
pub mod reference;

pub use error::{ReferenceError, ReferenceResult};
pub use key::ObjectKey;
pub use reference::{PayloadReference, ReferenceCodec, REFERENCE_FORMAT_VERSION};
