//! creds command - Obtain short-lived session credentials
//!
//! Prints an access/secret/token triple from the token service, suitable
//! for exporting into the environment of another process. The triple is
//! not refreshed; run the command again before expiry.

use clap::Args;

use pail_s3::SessionTokens;

use crate::commands::{fail, Globals};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Obtain short-lived session credentials
#[derive(Args, Debug)]
pub struct CredsArgs {
    /// Credential lifetime in seconds (issuer default when omitted)
    #[arg(long)]
    pub duration_secs: Option<u64>,
}

/// Execute the creds command
pub async fn execute(args: CredsArgs, globals: &Globals, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let tokens = SessionTokens::connect(globals.region.clone()).await;
    let duration = args.duration_secs.map(std::time::Duration::from_secs);

    match tokens.session_credentials(duration).await {
        Ok(credentials) => {
            if formatter.is_json() {
                formatter.json(&credentials);
            } else {
                formatter.println(&format!(
                    "export AWS_ACCESS_KEY_ID={}",
                    credentials.access_key_id
                ));
                formatter.println(&format!(
                    "export AWS_SECRET_ACCESS_KEY={}",
                    credentials.secret_access_key
                ));
                formatter.println(&format!(
                    "export AWS_SESSION_TOKEN={}",
                    credentials.session_token
                ));
                if let Some(expiration) = credentials.expiration {
                    formatter.warning(&format!(
                        "Credentials expire at {} UTC and are not refreshed automatically.",
                        expiration.strftime("%Y-%m-%d %H:%M:%S")
                    ));
                }
            }
            ExitCode::Success
        }
        Err(e) => fail(&formatter, "Failed to obtain session credentials", &e),
    }
}
