//! Profile management commands
//!
//! Profiles are named credential sets (access/secret key, optional
//! session token) plus the region/endpoint they apply to.

use clap::Subcommand;
use serde::Serialize;

use pail_core::{Profile, ProfileManager};

use crate::exit_code::ExitCode;

/// Profile subcommands for managing stored credentials
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or update a profile
    Set(SetArgs),

    /// List all configured profiles
    List,

    /// Remove a profile
    Remove(RemoveArgs),

    /// Show one profile (secrets masked)
    Show(ShowArgs),
}

/// Arguments for the `profile set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Profile name (e.g., "prod", "minio")
    pub name: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Session token for time-bounded credentials
    #[arg(long)]
    pub session_token: Option<String>,

    /// Region this profile applies to
    #[arg(long)]
    pub region: Option<String>,

    /// Endpoint URL (e.g., "http://localhost:9000")
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Use path-style bucket addressing
    #[arg(long)]
    pub path_style: bool,
}

/// Arguments for the `profile remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the profile to remove
    pub name: String,
}

/// Arguments for the `profile show` command
#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Name of the profile to show
    pub name: String,
}

/// Profile information for output, without secrets
#[derive(Serialize)]
struct ProfileInfo {
    name: String,
    access_key: String,
    has_session_token: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    endpoint: Option<String>,
    force_path_style: bool,
}

impl From<&Profile> for ProfileInfo {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            access_key: profile.access_key.clone(),
            has_session_token: profile.session_token.is_some(),
            region: profile.region.clone(),
            endpoint: profile.endpoint.clone(),
            force_path_style: profile.force_path_style,
        }
    }
}

#[derive(Serialize)]
struct ProfileListOutput {
    profiles: Vec<ProfileInfo>,
}

#[derive(Serialize)]
struct ProfileOperationOutput {
    status: &'static str,
    name: String,
}

/// Execute a profile subcommand
pub async fn execute(cmd: ProfileCommands, json: bool) -> ExitCode {
    let manager = match ProfileManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Failed to open configuration: {e}");
            return ExitCode::GeneralError;
        }
    };

    match cmd {
        ProfileCommands::Set(args) => set(&manager, args, json),
        ProfileCommands::List => list(&manager, json),
        ProfileCommands::Remove(args) => remove(&manager, args, json),
        ProfileCommands::Show(args) => show(&manager, args, json),
    }
}

fn set(manager: &ProfileManager, args: SetArgs, json: bool) -> ExitCode {
    let profile = Profile {
        name: args.name.clone(),
        access_key: args.access_key,
        secret_key: args.secret_key,
        session_token: args.session_token,
        region: args.region,
        endpoint: args.endpoint,
        force_path_style: args.path_style,
    };

    match manager.set(profile) {
        Ok(()) => {
            if json {
                print_json(&ProfileOperationOutput {
                    status: "success",
                    name: args.name,
                });
            } else {
                println!("Profile '{}' saved.", args.name);
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Failed to save profile: {e}");
            ExitCode::from_error(&e)
        }
    }
}

fn list(manager: &ProfileManager, json: bool) -> ExitCode {
    match manager.list() {
        Ok(profiles) => {
            if json {
                print_json(&ProfileListOutput {
                    profiles: profiles.iter().map(ProfileInfo::from).collect(),
                });
            } else {
                for profile in &profiles {
                    let endpoint = profile.endpoint.as_deref().unwrap_or("(default endpoint)");
                    let region = profile.region.as_deref().unwrap_or("-");
                    println!("{:<16} {:<12} {endpoint}", profile.name, region);
                }
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Failed to list profiles: {e}");
            ExitCode::from_error(&e)
        }
    }
}

fn remove(manager: &ProfileManager, args: RemoveArgs, json: bool) -> ExitCode {
    match manager.remove(&args.name) {
        Ok(()) => {
            if json {
                print_json(&ProfileOperationOutput {
                    status: "success",
                    name: args.name,
                });
            } else {
                println!("Profile '{}' removed.", args.name);
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Failed to remove profile: {e}");
            ExitCode::from_error(&e)
        }
    }
}

fn show(manager: &ProfileManager, args: ShowArgs, json: bool) -> ExitCode {
    match manager.get(&args.name) {
        Ok(profile) => {
            let info = ProfileInfo::from(&profile);
            if json {
                print_json(&info);
            } else {
                println!("name:            {}", info.name);
                println!("access key:      {}", info.access_key);
                println!("secret key:      ********");
                println!("session token:   {}", if info.has_session_token { "set" } else { "-" });
                println!("region:          {}", info.region.as_deref().unwrap_or("-"));
                println!("endpoint:        {}", info.endpoint.as_deref().unwrap_or("-"));
                println!("path style:      {}", info.force_path_style);
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Failed to show profile: {e}");
            ExitCode::from_error(&e)
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing output: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_info_hides_secret() {
        let mut profile = Profile::new("p", "AKIA", "very-secret");
        profile.session_token = Some("token".into());

        let info = ProfileInfo::from(&profile);
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("AKIA"));
        assert!(!json.contains("very-secret"));
        assert!(!json.contains("token"));
        assert!(json.contains("has_session_token"));
    }
}
