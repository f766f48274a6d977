use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::client::{ObjectBody, ObjectStoreClient};
use crate::error::{ClientError, ClientResult};
use crate::request::{ObjectCannedAcl, PutObjectRequest, ServerSideEncryption};

const BODY_EXTENSION: &str = "obj";
const META_EXTENSION: &str = "meta.json";

/// Longest hex stem used as-is; longer keys are stored under a hashed stem so
/// every file name stays well below the usual 255-byte limit.
const MAX_HEX_STEM_LEN: usize = 200;
const HASHED_STEM_PREFIX: &str = "h-";

/// Write metadata kept next to each object body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub server_side_encryption: Option<ServerSideEncryption>,
    pub sse_kms_key_id: Option<String>,
    pub acl: Option<ObjectCannedAcl>,
    pub content_length: u64,
}

/// Object store client backed by a local directory.
///
/// On-disk layout:
/// ```text
/// <root>/<bucket>/<hex(key)>.obj         object body
/// <root>/<bucket>/<hex(key)>.meta.json   encryption/ACL metadata
/// ```
///
/// Keys are hex-encoded, so a key containing `/` or `..` always names a file
/// directly inside its bucket directory. Keys whose hex form is longer than
/// 200 characters are stored as `h-<blake3(key)>` instead.
///
/// Each write goes to its own temporary file in the bucket directory and is
/// renamed into place, so concurrent writers to one key never interleave:
/// the object ends up holding exactly one writer's body.
#[derive(Clone, Debug)]
pub struct FileSystemObjectStoreClient {
    root: PathBuf,
}

impl FileSystemObjectStoreClient {
    /// Open a client rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> ClientResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a bucket directory. Existing buckets are left as they are.
    pub fn create_bucket(&self, bucket: &str) -> ClientResult<PathBuf> {
        let dir = self.bucket_dir(bucket)?;
        fs::create_dir_all(&dir)?;
        debug!(bucket, path = %dir.display(), "bucket created");
        Ok(dir)
    }

    /// Read the metadata written alongside an object.
    pub fn metadata(&self, bucket: &str, key: &str) -> ClientResult<ObjectMetadata> {
        let dir = self.existing_bucket_dir(bucket)?;
        let path = dir.join(object_file_name(key, META_EXTENSION));
        let bytes = fs::read(&path).map_err(|e| not_found_as_no_such_key(e, bucket, key))?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Transport(e.to_string()))
    }

    fn bucket_dir(&self, bucket: &str) -> ClientResult<PathBuf> {
        if bucket.is_empty()
            || bucket == "."
            || bucket == ".."
            || bucket.contains(['/', '\\'])
        {
            return Err(ClientError::Transport(format!("invalid bucket name: {bucket:?}")));
        }
        Ok(self.root.join(bucket))
    }

    fn existing_bucket_dir(&self, bucket: &str) -> ClientResult<PathBuf> {
        let dir = self.bucket_dir(bucket)?;
        if !dir.is_dir() {
            return Err(ClientError::NoSuchBucket(bucket.to_string()));
        }
        Ok(dir)
    }
}

fn object_file_name(key: &str, extension: &str) -> String {
    let stem = hex::encode(key.as_bytes());
    if stem.len() <= MAX_HEX_STEM_LEN {
        format!("{stem}.{extension}")
    } else {
        let hash = blake3::hash(key.as_bytes());
        format!("{HASHED_STEM_PREFIX}{}.{extension}", hash.to_hex())
    }
}

fn not_found_as_no_such_key(err: io::Error, bucket: &str, key: &str) -> ClientError {
    if err.kind() == io::ErrorKind::NotFound {
        ClientError::NoSuchKey {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    } else {
        ClientError::Io(err)
    }
}

/// Write `bytes` to a uniquely named temporary file in `dir` and rename it
/// over `path`. The temporary file is removed if any step fails.
fn write_atomically(dir: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

impl ObjectStoreClient for FileSystemObjectStoreClient {
    fn put_object(&self, request: &PutObjectRequest) -> ClientResult<()> {
        let dir = self.existing_bucket_dir(&request.bucket)?;
        let metadata = ObjectMetadata {
            server_side_encryption: request.server_side_encryption,
            sse_kms_key_id: request.sse_kms_key_id.clone(),
            acl: request.acl,
            content_length: request.body.len() as u64,
        };
        let meta_bytes =
            serde_json::to_vec(&metadata).map_err(|e| ClientError::Transport(e.to_string()))?;

        write_atomically(
            &dir,
            &dir.join(object_file_name(&request.key, BODY_EXTENSION)),
            request.body.as_bytes(),
        )?;
        write_atomically(
            &dir,
            &dir.join(object_file_name(&request.key, META_EXTENSION)),
            &meta_bytes,
        )?;

        debug!(
            bucket = %request.bucket,
            key = %request.key,
            len = request.body.len(),
            "object written"
        );
        Ok(())
    }

    fn get_object(&self, bucket: &str, key: &str) -> ClientResult<ObjectBody> {
        let dir = self.existing_bucket_dir(bucket)?;
        let path = dir.join(object_file_name(key, BODY_EXTENSION));
        let file = File::open(&path).map_err(|e| not_found_as_no_such_key(e, bucket, key))?;
        Ok(ObjectBody::new(file))
    }

    fn delete_object(&self, bucket: &str, key: &str) -> ClientResult<()> {
        let dir = self.existing_bucket_dir(bucket)?;
        remove_if_present(&dir.join(object_file_name(key, BODY_EXTENSION)))?;
        remove_if_present(&dir.join(object_file_name(key, META_EXTENSION)))?;
        debug!(bucket, key, "object removed");
        Ok(())
    }
}
