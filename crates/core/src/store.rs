//! ObjectStore trait definition
//!
//! This trait defines the page-level storage primitives implemented by
//! the SDK adapter. It keeps the facade decoupled from any specific S3
//! SDK and can be mocked for testing.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Bucket, ListOptions, ObjectPage, ObjectSummary, StoredObject, VersionPage,
};

/// Page-level operations against an S3-compatible storage provider
///
/// Every method maps to a single provider request. Composite semantics
/// (idempotent creation, drain-then-delete) live in [`crate::Facade`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List all buckets visible to the configured credentials
    async fn list_buckets(&self) -> Result<Vec<Bucket>>;

    /// Check whether a bucket exists, without listing
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;

    /// Create a bucket, scoped to `region` when given
    ///
    /// Fails with `AlreadyExists` if the name is taken.
    async fn create_bucket(&self, bucket: &str, region: Option<String>) -> Result<()>;

    /// Delete a bucket; the provider rejects non-empty buckets
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// List one page of objects
    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ObjectPage>;

    /// List one page of object versions and delete markers
    async fn list_versions(
        &self,
        bucket: &str,
        key_marker: Option<String>,
        version_id_marker: Option<String>,
    ) -> Result<VersionPage>;

    /// Get an object's content and metadata
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject>;

    /// Store content under a key, overwriting any existing object
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectSummary>;

    /// Server-side copy preserving the key name
    async fn copy_object(&self, key: &str, from_bucket: &str, to_bucket: &str) -> Result<()>;

    /// Delete a single object
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// Delete several objects in one provider call, returning deleted keys
    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<Vec<String>>;

    /// Delete a specific object version or delete marker
    async fn delete_version(&self, bucket: &str, key: &str, version_id: &str) -> Result<()>;
}
