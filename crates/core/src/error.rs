//! Error types for pail-core
//!
//! Provides the unified error type shared by the facade, the SDK adapter
//! and the CLI, and its mapping to process exit codes.

use thiserror::Error;

/// Result type alias for pail operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for pail operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Bucket or object does not exist where existence was required
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Provider-side failure, surfaced with the provider's code and message
    #[error("Service error [{}]: {message}", .code.as_deref().unwrap_or("unknown"))]
    Service {
        code: Option<String>,
        message: String,
    },

    /// IO error reading or writing local files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Shorthand for a service error without a provider code
    pub fn service(message: impl Into<String>) -> Self {
        Error::Service {
            code: None,
            message: message.into(),
        }
    }

    /// Whether this is a provider permission failure
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Error::Service { code: Some(c), .. } if c == "AccessDenied")
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::InvalidPath(_) => 2, // UsageError
            Error::Service { .. } if self.is_access_denied() => 4, // AuthError
            Error::Service { .. } => 3,                    // ServiceError
            Error::NotFound(_) | Error::ProfileNotFound(_) => 5, // NotFound
            Error::AlreadyExists(_) => 6,                  // Conflict
            _ => 1,                                        // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 2);
        assert_eq!(Error::service("test").exit_code(), 3);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::ProfileNotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::AlreadyExists("test".into()).exit_code(), 6);
        assert_eq!(
            Error::Io(std::io::Error::other("test")).exit_code(),
            1
        );
    }

    #[test]
    fn test_access_denied_exit_code() {
        let err = Error::Service {
            code: Some("AccessDenied".into()),
            message: "no".into(),
        };
        assert!(err.is_access_denied());
        assert_eq!(err.exit_code(), 4);

        let err = Error::Service {
            code: Some("SlowDown".into()),
            message: "throttled".into(),
        };
        assert!(!err.is_access_denied());
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("s3://b/missing.txt".into());
        assert_eq!(err.to_string(), "Not found: s3://b/missing.txt");

        let err = Error::Service {
            code: Some("NoSuchBucket".into()),
            message: "the bucket does not exist".into(),
        };
        assert_eq!(
            err.to_string(),
            "Service error [NoSuchBucket]: the bucket does not exist"
        );

        let err = Error::service("connection reset");
        assert_eq!(err.to_string(), "Service error [unknown]: connection reset");
    }
}
