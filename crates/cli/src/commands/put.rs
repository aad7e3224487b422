//! put command - Upload a file as an object
//!
//! The object key defaults to the file's base name when the target path
//! stops at the bucket or ends with a slash.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use pail_core::parse_remote;

use crate::commands::{connect_facade, fail, upload_key, Globals};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Upload a file as an object
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Local file to upload
    pub file: PathBuf,

    /// Target (s3://bucket[/key]); the key defaults to the file name
    pub target: String,
}

#[derive(Debug, Serialize)]
struct PutOutput {
    status: &'static str,
    source: String,
    target: String,
    size_bytes: i64,
}

/// Execute the put command
pub async fn execute(args: PutArgs, globals: &Globals, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let remote = match parse_remote(&args.target) {
        Ok(remote) => remote,
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };
    let key = match upload_key(&remote, &args.file) {
        Ok(key) => key,
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };

    if !args.file.is_file() {
        formatter.error(&format!("Source not found: {}", args.file.display()));
        return ExitCode::NotFound;
    }

    let facade = match connect_facade(globals).await {
        Ok(facade) => facade,
        Err(e) => return fail(&formatter, "Failed to create S3 client", &e),
    };

    match facade
        .put_object(&remote.bucket, Some(&key), &args.file)
        .await
    {
        Ok(summary) => {
            let target = format!("s3://{}/{}", remote.bucket, summary.key);
            if formatter.is_json() {
                formatter.json(&PutOutput {
                    status: "success",
                    source: args.file.display().to_string(),
                    target,
                    size_bytes: summary.size_bytes,
                });
            } else {
                formatter.println(&format!(
                    "{} -> {target} ({})",
                    args.file.display(),
                    summary.size_human()
                ));
            }
            ExitCode::Success
        }
        Err(e) => {
            fail(
                &formatter,
                &format!("Failed to upload {}", args.file.display()),
                &e,
            )
        }
    }
}
