//! Transfer helper for file upload and download
//!
//! Chooses single-shot vs. multipart strategy by object size and blocks
//! the caller until the transfer fully completes. Errors and
//! interruption surface as failures; there are no progress callbacks.

use std::path::Path;

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_smithy_types::byte_stream::Length;
use futures::stream::{self, StreamExt, TryStreamExt};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use pail_core::{Error, Result};

use crate::client::S3Store;
use crate::error::{service_error, service_error_or_not_found};

/// Default size above which transfers switch to multipart
pub const DEFAULT_MULTIPART_THRESHOLD: u64 = 64 * 1024 * 1024;

/// Default part size: 64 MiB
pub const DEFAULT_PART_SIZE: u64 = 64 * 1024 * 1024;

/// Minimum part size: 5 MiB (S3 requirement)
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum part size: 5 GiB
pub const MAX_PART_SIZE: u64 = 5 * 1024 * 1024 * 1024;

/// Maximum number of parts: 10,000 (S3 limit)
pub const MAX_PARTS: usize = 10_000;

/// Transfer strategy configuration
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Object size at which multipart transfer kicks in
    pub multipart_threshold: u64,

    /// Part size in bytes
    pub part_size: u64,

    /// Number of concurrent part uploads
    pub concurrency: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            multipart_threshold: DEFAULT_MULTIPART_THRESHOLD,
            part_size: DEFAULT_PART_SIZE,
            concurrency: 4,
        }
    }
}

impl TransferConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn multipart_threshold(mut self, size: u64) -> Self {
        self.multipart_threshold = size.max(MIN_PART_SIZE);
        self
    }

    pub fn part_size(mut self, size: u64) -> Self {
        self.part_size = size.clamp(MIN_PART_SIZE, MAX_PART_SIZE);
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Calculate the effective part size for a file
    ///
    /// Grows the configured part size when needed to stay within the
    /// provider's 10,000-part limit.
    pub fn calculate_part_size(&self, file_size: u64) -> u64 {
        if file_size <= MIN_PART_SIZE {
            return MIN_PART_SIZE;
        }

        let parts = file_size.div_ceil(self.part_size);
        if parts <= MAX_PARTS as u64 {
            self.part_size
        } else {
            let required_size = file_size.div_ceil(MAX_PARTS as u64);
            required_size.clamp(MIN_PART_SIZE, MAX_PART_SIZE)
        }
    }
}

/// Transfer helper bound to a store handle
#[derive(Debug, Clone)]
pub struct Transfer {
    client: aws_sdk_s3::Client,
    config: TransferConfig,
}

impl Transfer {
    /// Create a transfer helper with default configuration
    pub fn new(store: &S3Store) -> Self {
        Self::with_config(store, TransferConfig::default())
    }

    /// Create a transfer helper with explicit configuration
    pub fn with_config(store: &S3Store, config: TransferConfig) -> Self {
        Self {
            client: store.inner().clone(),
            config,
        }
    }

    /// Upload a file, waiting until the transfer completes
    ///
    /// Files below the multipart threshold go up in one request; larger
    /// files are split into parts uploaded with bounded concurrency.
    pub async fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> Result<()> {
        let size = tokio::fs::metadata(path).await?.len();
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string());

        if size < self.config.multipart_threshold {
            debug!(bucket, key, size, "uploading in a single request");
            let body = ByteStream::from_path(path)
                .await
                .map_err(|e| Error::service(format!("upload: {e}")))?;
            self.client
                .put_object()
                .bucket(bucket)
                .key(key)
                .body(body)
                .set_content_type(content_type)
                .send()
                .await
                .map_err(|e| service_error("upload", e.into_service_error()))?;
            return Ok(());
        }

        self.upload_multipart(bucket, key, path, size, content_type)
            .await
    }

    async fn upload_multipart(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        size: u64,
        content_type: Option<String>,
    ) -> Result<()> {
        let part_size = self.config.calculate_part_size(size);
        let part_count = size.div_ceil(part_size);
        debug!(bucket, key, size, part_size, part_count, "uploading multipart");

        let create = self
            .client
            .create_multipart_upload()
            .bucket(bucket)
            .key(key)
            .set_content_type(content_type)
            .send()
            .await
            .map_err(|e| service_error("create multipart upload", e.into_service_error()))?;
        let upload_id = create
            .upload_id()
            .ok_or_else(|| Error::service("create multipart upload: missing upload id"))?
            .to_string();

        match self
            .upload_parts(bucket, key, path, &upload_id, part_size, size)
            .await
        {
            Ok(parts) => {
                self.client
                    .complete_multipart_upload()
                    .bucket(bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .multipart_upload(
                        CompletedMultipartUpload::builder()
                            .set_parts(Some(parts))
                            .build(),
                    )
                    .send()
                    .await
                    .map_err(|e| {
                        service_error("complete multipart upload", e.into_service_error())
                    })?;
                Ok(())
            }
            Err(err) => {
                // release the provider-side upload state before failing
                if let Err(abort_err) = self
                    .client
                    .abort_multipart_upload()
                    .bucket(bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .send()
                    .await
                {
                    warn!(bucket, key, error = ?abort_err, "failed to abort multipart upload");
                }
                Err(err)
            }
        }
    }

    async fn upload_parts(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        upload_id: &str,
        part_size: u64,
        size: u64,
    ) -> Result<Vec<CompletedPart>> {
        let part_count = size.div_ceil(part_size) as i32;

        let parts = stream::iter((1..=part_count).map(|part_number| async move {
            let (start, end) = part_byte_range(part_number, part_size, size);
            let body = ByteStream::read_from()
                .path(path)
                .offset(start)
                .length(Length::Exact(end - start))
                .build()
                .await
                .map_err(|e| Error::service(format!("read part {part_number}: {e}")))?;

            let response = self
                .client
                .upload_part()
                .bucket(bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(body)
                .send()
                .await
                .map_err(|e| service_error("upload part", e.into_service_error()))?;

            Ok::<CompletedPart, Error>(
                CompletedPart::builder()
                    .part_number(part_number)
                    .set_e_tag(response.e_tag().map(str::to_string))
                    .build(),
            )
        }))
        .buffered(self.config.concurrency)
        .try_collect::<Vec<_>>()
        .await?;

        Ok(parts)
    }

    /// Download an object to a file, waiting until the transfer completes
    ///
    /// Objects below the multipart threshold stream down in one request;
    /// larger objects are fetched as ranged requests appended in order.
    /// Any existing file at `path` is overwritten.
    pub async fn download_file(&self, bucket: &str, key: &str, path: &Path) -> Result<()> {
        let head = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let service = err.into_service_error();
                if service.is_not_found() {
                    Error::NotFound(format!("s3://{bucket}/{key}"))
                } else {
                    service_error("download", service)
                }
            })?;
        let size = head.content_length().unwrap_or(0).max(0) as u64;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut file = tokio::fs::File::create(path).await?;

        if size < self.config.multipart_threshold {
            debug!(bucket, key, size, "downloading in a single request");
            let response = self
                .client
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| {
                    service_error_or_not_found(
                        "download",
                        &format!("s3://{bucket}/{key}"),
                        e.into_service_error(),
                    )
                })?;
            write_body(&mut file, response.body).await?;
        } else {
            let part_size = self.config.calculate_part_size(size);
            debug!(bucket, key, size, part_size, "downloading in ranges");

            let mut start = 0u64;
            while start < size {
                let end = (start + part_size).min(size);
                let response = self
                    .client
                    .get_object()
                    .bucket(bucket)
                    .key(key)
                    .range(format!("bytes={}-{}", start, end - 1))
                    .send()
                    .await
                    .map_err(|e| {
                        service_error_or_not_found(
                            "download range",
                            &format!("s3://{bucket}/{key}"),
                            e.into_service_error(),
                        )
                    })?;
                write_body(&mut file, response.body).await?;
                start = end;
            }
        }

        file.flush().await?;
        Ok(())
    }
}

async fn write_body(file: &mut tokio::fs::File, mut body: ByteStream) -> Result<()> {
    while let Some(chunk) = body
        .try_next()
        .await
        .map_err(|e| Error::service(format!("download: {e}")))?
    {
        file.write_all(&chunk).await?;
    }
    Ok(())
}

/// Get the byte range covered by a part
fn part_byte_range(part_number: i32, part_size: u64, total_size: u64) -> (u64, u64) {
    let start = (part_number as u64 - 1) * part_size;
    let end = (start + part_size).min(total_size);
    (start, end)
}
