//! mb command - Make bucket
//!
//! Creates a bucket. Creation is idempotent: an existing bucket of the
//! same name is reported as success, not a conflict.

use clap::Args;
use serde::Serialize;

use pail_core::parse_remote;

use crate::commands::{connect_facade, fail, Globals};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Create a bucket
#[derive(Args, Debug)]
pub struct MbArgs {
    /// Bucket to create (s3://bucket)
    pub bucket: String,

    /// Region for the bucket (overrides profile and config defaults)
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Debug, Serialize)]
struct MbOutput {
    status: &'static str,
    bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
}

/// Execute the mb command
pub async fn execute(args: MbArgs, globals: &Globals, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let remote = match parse_remote(&args.bucket) {
        Ok(remote) => remote,
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };
    if !remote.key.is_empty() {
        formatter.error(&format!(
            "'{}' names an object. mb takes a bucket path: s3://bucket",
            args.bucket
        ));
        return ExitCode::UsageError;
    }

    let facade = match connect_facade(globals).await {
        Ok(facade) => facade,
        Err(e) => return fail(&formatter, "Failed to create S3 client", &e),
    };

    match facade
        .create_bucket(&remote.bucket, args.region.as_deref())
        .await
    {
        Ok(bucket) => {
            if formatter.is_json() {
                formatter.json(&MbOutput {
                    status: "success",
                    bucket: bucket.name,
                    region: bucket.region,
                });
            } else {
                formatter.success(&format!("Bucket 's3://{}' is ready.", bucket.name));
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, "Failed to create bucket", &e),
    }
}
