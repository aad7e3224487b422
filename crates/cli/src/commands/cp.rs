//! cp command - Copy between local files and buckets
//!
//! Local uploads and downloads go through the transfer helper, which
//! picks single-shot vs. multipart by size and blocks until completion.
//! Bucket-to-bucket copies are server-side and preserve the key.

use std::path::Path;

use clap::Args;
use serde::Serialize;

use pail_core::{parse_path, ParsedPath, RemotePath};
use pail_s3::{Transfer, TransferConfig};

use crate::commands::{connect_facade, fail, upload_key, Globals};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

const MIB: u64 = 1024 * 1024;

/// Copy between local files and buckets
#[derive(Args, Debug)]
pub struct CpArgs {
    /// Source (local path or s3://bucket/key)
    pub source: String,

    /// Destination (local path or s3://bucket[/key])
    pub target: String,

    /// Part size for multipart transfers, in MiB
    #[arg(long)]
    pub part_size: Option<u64>,

    /// Number of concurrent part uploads
    #[arg(long)]
    pub concurrency: Option<usize>,
}

#[derive(Debug, Serialize)]
struct CpOutput {
    status: &'static str,
    source: String,
    target: String,
}

impl CpArgs {
    fn transfer_config(&self) -> TransferConfig {
        let mut config = TransferConfig::new();
        if let Some(part_size) = self.part_size {
            config = config.part_size(part_size * MIB);
        }
        if let Some(concurrency) = self.concurrency {
            config = config.concurrency(concurrency);
        }
        config
    }
}

/// Execute the cp command
pub async fn execute(args: CpArgs, globals: &Globals, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let source = match parse_path(&args.source) {
        Ok(p) => p,
        Err(e) => return fail(&formatter, "Invalid source path", &e),
    };
    let target = match parse_path(&args.target) {
        Ok(p) => p,
        Err(e) => return fail(&formatter, "Invalid target path", &e),
    };

    match (&source, &target) {
        (ParsedPath::Local(src), ParsedPath::Remote(dst)) => {
            upload(src, dst, &args, globals, &formatter).await
        }
        (ParsedPath::Remote(src), ParsedPath::Local(dst)) => {
            download(src, dst, &args, globals, &formatter).await
        }
        (ParsedPath::Remote(src), ParsedPath::Remote(dst)) => {
            server_side_copy(src, dst, globals, &formatter).await
        }
        (ParsedPath::Local(_), ParsedPath::Local(_)) => {
            formatter.error("Cannot copy between two local paths. Use the system cp command.");
            ExitCode::UsageError
        }
    }
}

async fn upload(
    src: &Path,
    dst: &RemotePath,
    args: &CpArgs,
    globals: &Globals,
    formatter: &Formatter,
) -> ExitCode {
    if !src.is_file() {
        formatter.error(&format!("Source not found: {}", src.display()));
        return ExitCode::NotFound;
    }

    let key = match upload_key(dst, src) {
        Ok(key) => key,
        Err(e) => return fail(formatter, "Invalid target path", &e),
    };

    let facade = match connect_facade(globals).await {
        Ok(facade) => facade,
        Err(e) => return fail(formatter, "Failed to create S3 client", &e),
    };
    let transfer = Transfer::with_config(facade.store(), args.transfer_config());

    let target = format!("s3://{}/{key}", dst.bucket);
    match transfer.upload_file(&dst.bucket, &key, src).await {
        Ok(()) => {
            report_success(formatter, &src.display().to_string(), &target);
            ExitCode::Success
        }
        Err(e) => fail(formatter, &format!("Failed to upload {}", src.display()), &e),
    }
}

async fn download(
    src: &RemotePath,
    dst: &Path,
    args: &CpArgs,
    globals: &Globals,
    formatter: &Formatter,
) -> ExitCode {
    let key = match src.require_key() {
        Ok(key) => key.to_string(),
        Err(e) => return fail(formatter, "Invalid source path", &e),
    };

    // a directory target means "keep the object's base name"
    let dst_path = if dst.is_dir() || dst.to_string_lossy().ends_with('/') {
        dst.join(src.base_name())
    } else {
        dst.to_path_buf()
    };

    let facade = match connect_facade(globals).await {
        Ok(facade) => facade,
        Err(e) => return fail(formatter, "Failed to create S3 client", &e),
    };
    let transfer = Transfer::with_config(facade.store(), args.transfer_config());

    match transfer.download_file(&src.bucket, &key, &dst_path).await {
        Ok(()) => {
            report_success(formatter, &src.to_string(), &dst_path.display().to_string());
            ExitCode::Success
        }
        Err(e) => fail(formatter, &format!("Failed to download {src}"), &e),
    }
}

async fn server_side_copy(
    src: &RemotePath,
    dst: &RemotePath,
    globals: &Globals,
    formatter: &Formatter,
) -> ExitCode {
    let key = match src.require_key() {
        Ok(key) => key.to_string(),
        Err(e) => return fail(formatter, "Invalid source path", &e),
    };

    if !dst.key.is_empty() && dst.key != key {
        formatter.error(
            "Server-side copy preserves the key. Give only a target bucket: s3://bucket",
        );
        return ExitCode::UsageError;
    }

    let facade = match connect_facade(globals).await {
        Ok(facade) => facade,
        Err(e) => return fail(formatter, "Failed to create S3 client", &e),
    };

    match facade.copy_object(&key, &src.bucket, &dst.bucket).await {
        Ok(()) => {
            report_success(
                formatter,
                &src.to_string(),
                &format!("s3://{}/{key}", dst.bucket),
            );
            ExitCode::Success
        }
        Err(e) => fail(formatter, &format!("Failed to copy {src}"), &e),
    }
}

fn report_success(formatter: &Formatter, source: &str, target: &str) {
    if formatter.is_json() {
        formatter.json(&CpOutput {
            status: "success",
            source: source.to_string(),
            target: target.to_string(),
        });
    } else {
        formatter.println(&format!("{source} -> {target}"));
    }
}
