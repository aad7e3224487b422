//! Session credential helper
//!
//! Wraps the STS GetSessionToken API to obtain short-lived
//! access/secret/token triples. The credentials carry their expiration;
//! refreshing before expiry is the caller's responsibility.

use aws_config::{BehaviorVersion, Region};
use tracing::debug;

use pail_core::{Error, Result, SessionCredentials};

use crate::error::service_error;

/// STS client wrapper issuing session credentials
#[derive(Debug, Clone)]
pub struct SessionTokens {
    inner: aws_sdk_sts::Client,
}

impl SessionTokens {
    /// Build an STS client from the default provider chain
    pub async fn connect(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let config = loader.load().await;
        Self {
            inner: aws_sdk_sts::Client::new(&config),
        }
    }

    /// Wrap an injected, pre-built STS client
    pub fn from_client(client: aws_sdk_sts::Client) -> Self {
        Self { inner: client }
    }

    /// Issue session credentials, optionally bounding their lifetime
    ///
    /// Without an explicit duration the token service applies its own
    /// default (12 hours for account credentials).
    pub async fn session_credentials(
        &self,
        duration: Option<std::time::Duration>,
    ) -> Result<SessionCredentials> {
        let mut request = self.inner.get_session_token();
        if let Some(duration) = duration {
            request = request.duration_seconds(duration.as_secs().min(i32::MAX as u64) as i32);
        }

        let response = request
            .send()
            .await
            .map_err(|e| service_error("get session token", e.into_service_error()))?;

        let credentials = response
            .credentials()
            .ok_or_else(|| Error::service("get session token: no credentials in response"))?;

        let session = SessionCredentials {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().to_string(),
            expiration: jiff::Timestamp::from_second(credentials.expiration().secs()).ok(),
        };
        debug!(
            access_key_id = %session.access_key_id,
            expiration = ?session.expiration,
            "issued session credentials"
        );

        Ok(session)
    }
}
