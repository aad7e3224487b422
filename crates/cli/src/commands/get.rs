//! get command - Download an object to a file
//!
//! Without a target path the object lands in a generated temp file named
//! after the key.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use pail_core::parse_remote;

use crate::commands::{connect_facade, fail, Globals};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Download an object to a file
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Object to download (s3://bucket/key)
    pub source: String,

    /// Target file path; a temp file is generated when omitted
    pub target: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct GetOutput {
    status: &'static str,
    source: String,
    target: String,
    size_bytes: u64,
}

/// Execute the get command
pub async fn execute(args: GetArgs, globals: &Globals, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let remote = match parse_remote(&args.source) {
        Ok(remote) => remote,
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };
    let key = match remote.require_key() {
        Ok(key) => key.to_string(),
        Err(e) => return fail(&formatter, "Invalid path", &e),
    };

    let facade = match connect_facade(globals).await {
        Ok(facade) => facade,
        Err(e) => return fail(&formatter, "Failed to create S3 client", &e),
    };

    match facade
        .get_object_file(&remote.bucket, &key, args.target.as_deref())
        .await
    {
        Ok(path) => {
            let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            if formatter.is_json() {
                formatter.json(&GetOutput {
                    status: "success",
                    source: remote.to_string(),
                    target: path.display().to_string(),
                    size_bytes: size,
                });
            } else {
                formatter.println(&format!(
                    "{remote} -> {} ({})",
                    path.display(),
                    humansize::format_size(size, humansize::BINARY)
                ));
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, &format!("Failed to download {remote}"), &e),
    }
}
