//! Client construction
//!
//! A single configuration structure enumerates the recognized credential
//! options and is resolved exactly once into one concrete client handle.

use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};

use pail_core::profile::Profile;
use pail_core::types::{SessionCredentials, StaticCredentials};

/// Region used when neither caller, profile, nor environment supplies one
pub const DEFAULT_REGION: &str = "eu-west-1";

/// Where the client's credentials come from
#[derive(Debug, Clone, Default)]
pub enum CredentialSource {
    /// Standard provider chain: environment variables, shared
    /// credentials file, instance role
    #[default]
    DefaultChain,

    /// Long-lived access/secret key pair
    Static(StaticCredentials),

    /// Time-bounded access/secret/token triple; the caller refreshes
    Session(SessionCredentials),
}

/// Options resolved once at construction into one client handle
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    pub credentials: CredentialSource,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub force_path_style: bool,
}

impl ConnectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credentials(mut self, source: CredentialSource) -> Self {
        self.credentials = source;
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn force_path_style(mut self, enabled: bool) -> Self {
        self.force_path_style = enabled;
        self
    }

    /// Build options from a stored profile
    ///
    /// A profile carrying a session token maps to session credentials
    /// with unknown expiry; refresh remains the caller's concern.
    pub fn from_profile(profile: &Profile) -> Self {
        let credentials = match &profile.session_token {
            Some(token) => CredentialSource::Session(SessionCredentials {
                access_key_id: profile.access_key.clone(),
                secret_access_key: profile.secret_key.clone(),
                session_token: token.clone(),
                expiration: None,
            }),
            None => CredentialSource::Static(StaticCredentials::new(
                profile.access_key.clone(),
                profile.secret_key.clone(),
            )),
        };

        Self {
            credentials,
            region: profile.region.clone(),
            endpoint: profile.endpoint.clone(),
            force_path_style: profile.force_path_style,
        }
    }
}

/// Resolve options into a concrete aws-sdk-s3 client
pub(crate) async fn resolve(options: ConnectOptions) -> aws_sdk_s3::Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    loader = match &options.region {
        Some(region) => loader.region(Region::new(region.clone())),
        None => loader.region(
            RegionProviderChain::default_provider().or_else(Region::new(DEFAULT_REGION)),
        ),
    };

    loader = match options.credentials {
        CredentialSource::DefaultChain => loader,
        CredentialSource::Static(creds) => loader.credentials_provider(
            aws_credential_types::Credentials::new(
                creds.access_key_id,
                creds.secret_access_key,
                None,
                None,
                "pail-static",
            ),
        ),
        CredentialSource::Session(creds) => loader.credentials_provider(
            aws_credential_types::Credentials::new(
                creds.access_key_id,
                creds.secret_access_key,
                Some(creds.session_token),
                creds.expiration.and_then(timestamp_to_system_time),
                "pail-session",
            ),
        ),
    };

    let shared = loader.load().await;

    let mut builder =
        aws_sdk_s3::config::Builder::from(&shared).force_path_style(options.force_path_style);
    if let Some(endpoint) = &options.endpoint {
        builder = builder.endpoint_url(endpoint);
    }

    tracing::debug!(
        region = options.region.as_deref(),
        endpoint = options.endpoint.as_deref(),
        "resolved S3 client configuration"
    );

    aws_sdk_s3::Client::from_conf(builder.build())
}

/// Convert a jiff timestamp to SystemTime for the credentials provider
fn timestamp_to_system_time(ts: jiff::Timestamp) -> Option<std::time::SystemTime> {
    let seconds = ts.as_second();
    if seconds < 0 {
        return None;
    }
    Some(std::time::UNIX_EPOCH + std::time::Duration::from_secs(seconds as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ConnectOptions::new();
        assert!(matches!(options.credentials, CredentialSource::DefaultChain));
        assert!(options.region.is_none());
        assert!(options.endpoint.is_none());
        assert!(!options.force_path_style);
    }

    #[test]
    fn test_options_builder() {
        let options = ConnectOptions::new()
            .credentials(CredentialSource::Static(StaticCredentials::new("a", "s")))
            .region("us-east-1")
            .endpoint("http://localhost:9000")
            .force_path_style(true);

        assert!(matches!(options.credentials, CredentialSource::Static(_)));
        assert_eq!(options.region.as_deref(), Some("us-east-1"));
        assert_eq!(options.endpoint.as_deref(), Some("http://localhost:9000"));
        assert!(options.force_path_style);
    }

    #[test]
    fn test_from_profile_static() {
        let mut profile = Profile::new("p", "AKIA", "secret");
        profile.region = Some("us-west-2".to_string());

        let options = ConnectOptions::from_profile(&profile);
        match options.credentials {
            CredentialSource::Static(creds) => {
                assert_eq!(creds.access_key_id, "AKIA");
                assert_eq!(creds.secret_access_key, "secret");
            }
            other => panic!("expected static credentials, got {other:?}"),
        }
        assert_eq!(options.region.as_deref(), Some("us-west-2"));
    }

    #[test]
    fn test_from_profile_session() {
        let mut profile = Profile::new("p", "ASIA", "secret");
        profile.session_token = Some("token".to_string());

        let options = ConnectOptions::from_profile(&profile);
        match options.credentials {
            CredentialSource::Session(creds) => {
                assert_eq!(creds.session_token, "token");
                assert!(creds.expiration.is_none());
            }
            other => panic!("expected session credentials, got {other:?}"),
        }
    }

    #[test]
    fn test_timestamp_to_system_time() {
        let ts = jiff::Timestamp::from_second(1_700_000_000).unwrap();
        let system = timestamp_to_system_time(ts).unwrap();
        let roundtrip = system
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        assert_eq!(roundtrip, 1_700_000_000);

        let before_epoch = jiff::Timestamp::from_second(-1).unwrap();
        assert!(timestamp_to_system_time(before_epoch).is_none());
    }
}
