//! SDK error mapping
//!
//! Converts aws-sdk service errors into the pail error taxonomy while
//! preserving the provider's error code and message.

use aws_smithy_types::error::metadata::ProvideErrorMetadata;

use pail_core::Error;

/// Map a service error into `Error::Service`, keeping code and message
pub(crate) fn service_error<E>(context: &str, err: E) -> Error
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let code = err.code().map(str::to_string);
    let message = match err.message() {
        Some(message) => message.to_string(),
        None => err.to_string(),
    };
    Error::Service {
        code,
        message: format!("{context}: {message}"),
    }
}

/// Map a service error, treating the given codes as `NotFound`
pub(crate) fn service_error_or_not_found<E>(context: &str, location: &str, err: E) -> Error
where
    E: ProvideErrorMetadata + std::error::Error,
{
    match err.code() {
        Some("NoSuchKey" | "NoSuchBucket" | "NotFound") => Error::NotFound(location.to_string()),
        _ => service_error(context, err),
    }
}
