//! Value types for buckets, objects, listings and credentials
//!
//! All entities here are provider-owned and merely referenced by the
//! facade; none of them carry behavior beyond small accessors.

use serde::{Deserialize, Serialize};

/// A bucket visible to the configured credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Globally-unique bucket name
    pub name: String,

    /// Region the bucket lives in, when the provider reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Creation timestamp, when the provider reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<jiff::Timestamp>,
}

impl Bucket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: None,
            created: None,
        }
    }
}

/// Summary of an object as returned by listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    /// Object key
    pub key: String,

    /// Size in bytes
    pub size_bytes: i64,

    /// ETag (usually MD5 for single-part uploads)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,

    /// Storage class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

impl ObjectSummary {
    pub fn new(key: impl Into<String>, size_bytes: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes,
            etag: None,
            last_modified: None,
            storage_class: None,
        }
    }

    /// Human-readable size
    pub fn size_human(&self) -> String {
        humansize::format_size(self.size_bytes.max(0) as u64, humansize::BINARY)
    }
}

/// A fully-buffered object as returned by `get_object`
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Object key
    pub key: String,

    /// Object content
    pub content: Vec<u8>,

    /// Content type reported by the provider
    pub content_type: Option<String>,

    /// ETag of the stored object
    pub etag: Option<String>,

    /// Version id, when the bucket has versioning enabled
    pub version_id: Option<String>,
}

impl StoredObject {
    /// Content length in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// One page of an object listing
///
/// The caller follows `continuation_token` if completeness beyond one
/// page is required; nothing here auto-paginates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectPage {
    /// Listed objects
    pub objects: Vec<ObjectSummary>,

    /// Whether the result is truncated (more objects available)
    pub truncated: bool,

    /// Continuation token for the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

/// Summary of an object version or delete marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSummary {
    /// Object key
    pub key: String,

    /// Version id
    pub version_id: String,

    /// Whether this entry is a delete marker
    pub is_delete_marker: bool,
}

/// One page of a version listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionPage {
    /// Listed versions and delete markers
    pub versions: Vec<VersionSummary>,

    /// Whether the result is truncated (more versions available)
    pub truncated: bool,

    /// Key marker for the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_marker: Option<String>,

    /// Version id marker for the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id_marker: Option<String>,
}

/// Options for object listings
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Prefix to filter by
    pub prefix: Option<String>,

    /// Maximum number of keys to return in the page
    pub max_keys: Option<i32>,

    /// Continuation token from a previous page
    pub continuation_token: Option<String>,
}

impl ListOptions {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Default::default()
        }
    }
}

/// Long-lived access/secret key pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl StaticCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }
}

/// Time-bounded access/secret/token triple issued by a token service
///
/// The facade does not refresh these; callers check `is_expired` and
/// request a fresh set themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,

    /// Expiration time; `None` when the issuer did not report one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<jiff::Timestamp>,
}

impl SessionCredentials {
    /// Whether the credentials have already expired
    pub fn is_expired(&self) -> bool {
        self.expires_within(jiff::SignedDuration::ZERO)
    }

    /// Whether the credentials expire within the given duration
    pub fn expires_within(&self, window: jiff::SignedDuration) -> bool {
        match self.expiration {
            Some(expiration) => expiration.duration_since(jiff::Timestamp::now()) <= window,
            None => false,
        }
    }
}
