//! rm command - Remove objects
//!
//! Several keys in the same bucket are deleted with one batch call to
//! keep round trips down.

use std::collections::BTreeMap;

use clap::Args;
use serde::Serialize;

use pail_core::parse_remote;

use crate::commands::{connect_facade, fail, Globals};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Remove objects
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Objects to remove (s3://bucket/key)
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    status: &'static str,
    deleted: Vec<String>,
    total: usize,
}

/// Execute the rm command
pub async fn execute(args: RmArgs, globals: &Globals, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    // bucket -> keys, so same-bucket removals share one batch call
    let mut by_bucket: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for path in &args.paths {
        let remote = match parse_remote(path) {
            Ok(remote) => remote,
            Err(e) => return fail(&formatter, "Invalid path", &e),
        };
        let key = match remote.require_key() {
            Ok(key) => key.to_string(),
            Err(e) => return fail(&formatter, "Invalid path", &e),
        };
        by_bucket.entry(remote.bucket).or_default().push(key);
    }

    let facade = match connect_facade(globals).await {
        Ok(facade) => facade,
        Err(e) => return fail(&formatter, "Failed to create S3 client", &e),
    };

    let mut deleted = Vec::new();
    for (bucket, keys) in by_bucket {
        if let [key] = keys.as_slice() {
            match facade.delete_object(&bucket, key).await {
                Ok(()) => deleted.push(format!("s3://{bucket}/{key}")),
                Err(e) => return fail(&formatter, &format!("Failed to remove s3://{bucket}/{key}"), &e),
            }
        } else {
            match facade.delete_objects(&bucket, keys).await {
                Ok(keys) => {
                    deleted.extend(keys.into_iter().map(|key| format!("s3://{bucket}/{key}")));
                }
                Err(e) => {
                    return fail(
                        &formatter,
                        &format!("Failed to remove objects from s3://{bucket}"),
                        &e,
                    )
                }
            }
        }
    }

    if formatter.is_json() {
        let total = deleted.len();
        formatter.json(&RmOutput {
            status: "success",
            deleted,
            total,
        });
    } else {
        for path in &deleted {
            formatter.println(&format!("Removed {path}"));
        }
    }
    ExitCode::Success
}
