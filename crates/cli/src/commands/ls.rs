//! ls command - List buckets and objects
//!
//! Lists buckets when given no path, or one page of objects when given a
//! bucket path. Pagination is explicit: a truncated page reports its
//! continuation token and the caller passes it back with --continue-from.

use clap::Args;
use serde::Serialize;

use pail_core::{parse_remote, Bucket, ListOptions, ObjectSummary};

use crate::commands::{connect_facade, fail, Globals};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// List buckets or one page of objects
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Remote path (s3://bucket[/prefix]); omit to list buckets
    pub path: Option<String>,

    /// Maximum number of keys in the page
    #[arg(long)]
    pub max_keys: Option<i32>,

    /// Continuation token from a previous truncated listing
    #[arg(long)]
    pub continue_from: Option<String>,
}

#[derive(Debug, Serialize)]
struct BucketListOutput {
    buckets: Vec<Bucket>,
}

#[derive(Debug, Serialize)]
struct ObjectListOutput {
    objects: Vec<ObjectSummary>,
    truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    continuation_token: Option<String>,
}

/// Execute the ls command
pub async fn execute(args: LsArgs, globals: &Globals, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let facade = match connect_facade(globals).await {
        Ok(facade) => facade,
        Err(e) => return fail(&formatter, "Failed to create S3 client", &e),
    };

    let Some(path) = &args.path else {
        return list_buckets(&facade, &formatter).await;
    };

    let remote = match parse_remote(path) {
        Ok(remote) => remote,
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };

    let options = ListOptions {
        prefix: (!remote.key.is_empty()).then(|| remote.key.clone()),
        max_keys: args.max_keys,
        continuation_token: args.continue_from.clone(),
    };

    match facade.list_objects_with(&remote.bucket, options).await {
        Ok(page) => {
            if formatter.is_json() {
                formatter.json(&ObjectListOutput {
                    objects: page.objects,
                    truncated: page.truncated,
                    continuation_token: page.continuation_token,
                });
            } else {
                for object in &page.objects {
                    formatter.println(&format!(
                        "[{}] {:>10} {}",
                        format_date(object.last_modified),
                        object.size_human(),
                        object.key
                    ));
                }
                if page.truncated {
                    if let Some(token) = &page.continuation_token {
                        formatter.warning(&format!(
                            "Listing truncated. Continue with --continue-from {token}"
                        ));
                    }
                }
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, "Failed to list objects", &e),
    }
}

async fn list_buckets(
    facade: &pail_core::Facade<pail_s3::S3Store>,
    formatter: &Formatter,
) -> ExitCode {
    match facade.buckets().await {
        Ok(buckets) => {
            if formatter.is_json() {
                formatter.json(&BucketListOutput { buckets });
            } else {
                for bucket in &buckets {
                    formatter.println(&format!(
                        "[{}] s3://{}",
                        format_date(bucket.created),
                        bucket.name
                    ));
                }
            }
            ExitCode::Success
        }
        Err(e) => fail(formatter, "Failed to list buckets", &e),
    }
}

fn format_date(timestamp: Option<jiff::Timestamp>) -> String {
    match timestamp {
        Some(ts) => ts.strftime("%Y-%m-%d %H:%M:%S").to_string(),
        None => "                   ".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let ts = jiff::Timestamp::from_second(0).unwrap();
        assert_eq!(format_date(Some(ts)), "1970-01-01 00:00:00");
        assert_eq!(format_date(None).len(), 19);
    }

    #[test]
    fn test_prefix_comes_from_key() {
        let remote = parse_remote("s3://bucket/logs/").unwrap();
        let prefix = (!remote.key.is_empty()).then(|| remote.key.clone());
        assert_eq!(prefix.as_deref(), Some("logs/"));

        let remote = parse_remote("s3://bucket").unwrap();
        let prefix = (!remote.key.is_empty()).then(|| remote.key.clone());
        assert!(prefix.is_none());
    }
}
