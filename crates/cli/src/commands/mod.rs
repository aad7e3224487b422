//! CLI command definitions and execution
//!
//! This module contains all CLI commands and their implementations, one
//! file per command, plus the shared client bootstrap.

use std::path::Path;

use clap::{Parser, Subcommand};

use pail_core::{Facade, ProfileManager, RemotePath, Result};
use pail_s3::{ConnectOptions, S3Store};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

mod completions;
mod cp;
mod creds;
mod get;
mod ls;
mod mb;
mod profile;
mod put;
mod rb;
mod rm;

/// pail - object storage CLI
///
/// Bucket and object CRUD for S3-compatible storage services, with
/// accelerated transfers and session-credential helpers.
#[derive(Parser, Debug)]
#[command(name = "pail")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Credential profile to use
    #[arg(long, global = true, env = "PAIL_PROFILE")]
    pub profile: Option<String>,

    /// Region override
    #[arg(long, global = true, env = "PAIL_REGION")]
    pub region: Option<String>,

    /// Endpoint URL override (e.g. a MinIO instance)
    #[arg(long, global = true, env = "PAIL_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long, global = true)]
    pub path_style: bool,

    /// Output format: human-readable or JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List buckets or one page of objects
    Ls(ls::LsArgs),

    /// Create a bucket
    Mb(mb::MbArgs),

    /// Remove a bucket, deleting all objects and versions first
    Rb(rb::RbArgs),

    /// Download an object to a file
    Get(get::GetArgs),

    /// Upload a file as an object
    Put(put::PutArgs),

    /// Copy between local files and buckets using accelerated transfer
    Cp(cp::CpArgs),

    /// Remove objects
    Rm(rm::RmArgs),

    /// Obtain short-lived session credentials
    Creds(creds::CredsArgs),

    /// Manage credential profiles
    #[command(subcommand)]
    Profile(profile::ProfileCommands),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Connection-related global flags, resolved per invocation
#[derive(Debug, Clone)]
pub struct Globals {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub path_style: bool,
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    };
    let globals = Globals {
        profile: cli.profile,
        region: cli.region,
        endpoint: cli.endpoint,
        path_style: cli.path_style,
    };

    match cli.command {
        Commands::Ls(args) => ls::execute(args, &globals, output_config).await,
        Commands::Mb(args) => mb::execute(args, &globals, output_config).await,
        Commands::Rb(args) => rb::execute(args, &globals, output_config).await,
        Commands::Get(args) => get::execute(args, &globals, output_config).await,
        Commands::Put(args) => put::execute(args, &globals, output_config).await,
        Commands::Cp(args) => cp::execute(args, &globals, output_config).await,
        Commands::Rm(args) => rm::execute(args, &globals, output_config).await,
        Commands::Creds(args) => creds::execute(args, &globals, output_config).await,
        Commands::Profile(cmd) => profile::execute(cmd, cli.json).await,
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Resolve global flags and profile into a connected facade
///
/// Flags win over profile values; the config default region fills in
/// when neither supplies one.
pub(crate) async fn connect_facade(globals: &Globals) -> Result<Facade<S3Store>> {
    tracing::debug!(profile = globals.profile.as_deref(), "resolving client options");
    let profiles = ProfileManager::new()?;

    let mut options = match &globals.profile {
        Some(name) => ConnectOptions::from_profile(&profiles.get(name)?),
        None => ConnectOptions::new(),
    };

    if let Some(region) = &globals.region {
        options.region = Some(region.clone());
    } else if options.region.is_none() {
        options.region = profiles.default_region()?;
    }
    if let Some(endpoint) = &globals.endpoint {
        options.endpoint = Some(endpoint.clone());
    }
    if globals.path_style {
        options.force_path_style = true;
    }

    let region = options.region.clone();
    let store = S3Store::connect(options).await?;

    let mut facade = Facade::new(store);
    if let Some(region) = region {
        facade = facade.with_default_region(region);
    }
    Ok(facade)
}

/// Report an error and map it to an exit code
pub(crate) fn fail(formatter: &Formatter, context: &str, error: &pail_core::Error) -> ExitCode {
    formatter.error(&format!("{context}: {error}"));
    ExitCode::from_error(error)
}

/// Resolve the object key for an upload target
///
/// An empty key or a key ending in `/` means "directory semantics": the
/// file's base name is appended.
pub(crate) fn upload_key(remote: &RemotePath, file: &Path) -> Result<String> {
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            pail_core::Error::InvalidPath(format!("{} has no file name", file.display()))
        })?;

    if remote.key.is_empty() {
        Ok(file_name)
    } else if remote.key.ends_with('/') {
        Ok(format!("{}{}", remote.key, file_name))
    } else {
        Ok(remote.key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_key_defaults_to_file_name() {
        let remote = RemotePath::new("bucket", "");
        let key = upload_key(&remote, Path::new("/tmp/report.csv")).unwrap();
        assert_eq!(key, "report.csv");
    }

    #[test]
    fn test_upload_key_appends_under_prefix() {
        let remote = RemotePath::new("bucket", "archive/");
        let key = upload_key(&remote, Path::new("report.csv")).unwrap();
        assert_eq!(key, "archive/report.csv");
    }

    #[test]
    fn test_upload_key_exact() {
        let remote = RemotePath::new("bucket", "renamed.csv");
        let key = upload_key(&remote, Path::new("report.csv")).unwrap();
        assert_eq!(key, "renamed.csv");
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "pail",
            "--json",
            "--profile",
            "minio",
            "ls",
            "s3://bucket",
        ]);
        assert!(cli.json);
        assert_eq!(cli.profile.as_deref(), Some("minio"));
        assert!(matches!(cli.command, Commands::Ls(_)));
    }
}
