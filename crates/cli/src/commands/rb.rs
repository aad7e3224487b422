//! rb command - Remove bucket
//!
//! Empties and removes a bucket: all objects, then all versions and
//! delete markers, then the bucket itself.

use clap::Args;
use serde::Serialize;

use pail_core::parse_remote;

use crate::commands::{connect_facade, fail, Globals};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Remove a bucket and everything in it
#[derive(Args, Debug)]
pub struct RbArgs {
    /// Bucket to remove (s3://bucket)
    pub bucket: String,

    /// Confirm removal of the bucket and all its contents
    #[arg(long)]
    pub yes: bool,
}

#[derive(Debug, Serialize)]
struct RbOutput {
    status: &'static str,
    bucket: String,
}

/// Execute the rb command
pub async fn execute(args: RbArgs, globals: &Globals, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let remote = match parse_remote(&args.bucket) {
        Ok(remote) => remote,
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };
    if !remote.key.is_empty() {
        formatter.error(&format!(
            "'{}' names an object. rb takes a bucket path: s3://bucket",
            args.bucket
        ));
        return ExitCode::UsageError;
    }

    if !args.yes {
        formatter.error(&format!(
            "Removing 's3://{}' deletes all objects and versions in it. Pass --yes to confirm.",
            remote.bucket
        ));
        return ExitCode::UsageError;
    }

    let facade = match connect_facade(globals).await {
        Ok(facade) => facade,
        Err(e) => return fail(&formatter, "Failed to create S3 client", &e),
    };

    match facade.delete_bucket(&remote.bucket).await {
        Ok(()) => {
            if formatter.is_json() {
                formatter.json(&RbOutput {
                    status: "success",
                    bucket: remote.bucket,
                });
            } else {
                formatter.success(&format!("Bucket 's3://{}' removed.", remote.bucket));
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, "Failed to remove bucket", &e),
    }
}
