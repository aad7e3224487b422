//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from pail-core.
//! Every method is a single SDK call plus error mapping; composite
//! semantics live in the facade.

use async_trait::async_trait;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Delete, ObjectIdentifier,
};

use pail_core::{
    Bucket, Error, ListOptions, ObjectPage, ObjectStore, ObjectSummary, Result, StoredObject,
    VersionPage, VersionSummary,
};

use crate::connect::{self, ConnectOptions};
use crate::error::{service_error, service_error_or_not_found};

/// S3 store handle implementing the ObjectStore trait
#[derive(Debug, Clone)]
pub struct S3Store {
    inner: aws_sdk_s3::Client,
}

impl S3Store {
    /// Resolve connection options into a client, once
    pub async fn connect(options: ConnectOptions) -> Result<Self> {
        let client = connect::resolve(options).await;
        Ok(Self { inner: client })
    }

    /// Wrap an injected, pre-built SDK client
    pub fn from_client(client: aws_sdk_s3::Client) -> Self {
        Self { inner: client }
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_buckets(&self) -> Result<Vec<Bucket>> {
        let response = self
            .inner
            .list_buckets()
            .send()
            .await
            .map_err(|e| service_error("list buckets", e.into_service_error()))?;

        let buckets = response
            .buckets()
            .iter()
            .map(|b| Bucket {
                name: b.name().unwrap_or_default().to_string(),
                region: b.bucket_region().map(str::to_string),
                created: b
                    .creation_date()
                    .and_then(|d| jiff::Timestamp::from_second(d.secs()).ok()),
            })
            .collect();

        Ok(buckets)
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        match self.inner.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let service = err.into_service_error();
                if service.is_not_found() {
                    Ok(false)
                } else {
                    Err(service_error("head bucket", service))
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &str, region: Option<String>) -> Result<()> {
        let mut request = self.inner.create_bucket().bucket(bucket);

        // us-east-1 is the provider default and must not be sent as a
        // location constraint
        if let Some(region) = region.filter(|r| r != "us-east-1") {
            let constraint = BucketLocationConstraint::from(region.as_str());
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(constraint)
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => Ok(()),
            Err(err) => {
                let service = err.into_service_error();
                if service.is_bucket_already_owned_by_you() || service.is_bucket_already_exists() {
                    Err(Error::AlreadyExists(bucket.to_string()))
                } else {
                    Err(service_error("create bucket", service))
                }
            }
        }
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.inner
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| {
                service_error_or_not_found(
                    "delete bucket",
                    &format!("s3://{bucket}"),
                    e.into_service_error(),
                )
            })?;

        Ok(())
    }

    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ObjectPage> {
        let response = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .set_prefix(options.prefix)
            .set_max_keys(options.max_keys)
            .set_continuation_token(options.continuation_token)
            .send()
            .await
            .map_err(|e| {
                service_error_or_not_found(
                    "list objects",
                    &format!("s3://{bucket}"),
                    e.into_service_error(),
                )
            })?;

        let objects = response
            .contents()
            .iter()
            .map(|object| ObjectSummary {
                key: object.key().unwrap_or_default().to_string(),
                size_bytes: object.size().unwrap_or(0),
                etag: object.e_tag().map(clean_etag),
                last_modified: object
                    .last_modified()
                    .and_then(|d| jiff::Timestamp::from_second(d.secs()).ok()),
                storage_class: object.storage_class().map(|sc| sc.as_str().to_string()),
            })
            .collect();

        Ok(ObjectPage {
            objects,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(str::to_string),
        })
    }

    async fn list_versions(
        &self,
        bucket: &str,
        key_marker: Option<String>,
        version_id_marker: Option<String>,
    ) -> Result<VersionPage> {
        let response = self
            .inner
            .list_object_versions()
            .bucket(bucket)
            .set_key_marker(key_marker)
            .set_version_id_marker(version_id_marker)
            .send()
            .await
            .map_err(|e| {
                service_error_or_not_found(
                    "list versions",
                    &format!("s3://{bucket}"),
                    e.into_service_error(),
                )
            })?;

        let mut versions: Vec<VersionSummary> = response
            .versions()
            .iter()
            .filter_map(|v| {
                Some(VersionSummary {
                    key: v.key()?.to_string(),
                    version_id: v.version_id()?.to_string(),
                    is_delete_marker: false,
                })
            })
            .collect();

        versions.extend(response.delete_markers().iter().filter_map(|m| {
            Some(VersionSummary {
                key: m.key()?.to_string(),
                version_id: m.version_id()?.to_string(),
                is_delete_marker: true,
            })
        }));

        Ok(VersionPage {
            versions,
            truncated: response.is_truncated().unwrap_or(false),
            key_marker: response.next_key_marker().map(str::to_string),
            version_id_marker: response.next_version_id_marker().map(str::to_string),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let service = err.into_service_error();
                if service.is_no_such_key() {
                    Error::NotFound(format!("s3://{bucket}/{key}"))
                } else {
                    service_error_or_not_found(
                        "get object",
                        &format!("s3://{bucket}/{key}"),
                        service,
                    )
                }
            })?;

        let content_type = response.content_type().map(str::to_string);
        let etag = response.e_tag().map(clean_etag);
        let version_id = response.version_id().map(str::to_string);

        let content = response
            .body
            .collect()
            .await
            .map_err(|e| Error::service(format!("get object: {e}")))?
            .into_bytes()
            .to_vec();

        Ok(StoredObject {
            key: key.to_string(),
            content,
            content_type,
            etag,
            version_id,
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectSummary> {
        let size = content.len() as i64;
        let body = aws_sdk_s3::primitives::ByteStream::from(content);

        let response = self
            .inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .set_content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                service_error_or_not_found(
                    "put object",
                    &format!("s3://{bucket}"),
                    e.into_service_error(),
                )
            })?;

        let mut summary = ObjectSummary::new(key, size);
        summary.etag = response.e_tag().map(clean_etag);
        summary.last_modified = Some(jiff::Timestamp::now());

        Ok(summary)
    }

    async fn copy_object(&self, key: &str, from_bucket: &str, to_bucket: &str) -> Result<()> {
        let copy_source = format!("{from_bucket}/{key}");

        self.inner
            .copy_object()
            .copy_source(&copy_source)
            .bucket(to_bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                service_error_or_not_found(
                    "copy object",
                    &format!("s3://{from_bucket}/{key}"),
                    e.into_service_error(),
                )
            })?;

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                service_error_or_not_found(
                    "delete object",
                    &format!("s3://{bucket}/{key}"),
                    e.into_service_error(),
                )
            })?;

        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<Vec<String>> {
        if keys.is_empty() {
            return Ok(vec![]);
        }

        let objects: Vec<ObjectIdentifier> = keys
            .iter()
            .map(|k| ObjectIdentifier::builder().key(k).build())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::service(format!("delete objects: {e}")))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| Error::service(format!("delete objects: {e}")))?;

        let response = self
            .inner
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| {
                service_error_or_not_found(
                    "delete objects",
                    &format!("s3://{bucket}"),
                    e.into_service_error(),
                )
            })?;

        let deleted: Vec<String> = response
            .deleted()
            .iter()
            .filter_map(|d| d.key().map(str::to_string))
            .collect();

        if !response.errors().is_empty() {
            let failed: Vec<&str> = response
                .errors()
                .iter()
                .filter_map(|e| e.key())
                .collect();
            tracing::warn!(bucket, ?failed, "failed to delete some objects");
        }

        Ok(deleted)
    }

    async fn delete_version(&self, bucket: &str, key: &str, version_id: &str) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .version_id(version_id)
            .send()
            .await
            .map_err(|e| {
                service_error_or_not_found(
                    "delete version",
                    &format!("s3://{bucket}/{key}@{version_id}"),
                    e.into_service_error(),
                )
            })?;

        Ok(())
    }
}

/// Strip the quotes providers wrap ETags in
fn clean_etag(etag: &str) -> String {
    etag.trim_matches('"').to_string()
}
