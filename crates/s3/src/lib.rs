//! pail-s3: AWS SDK adapter for the pail object-storage facade
//!
//! This crate provides the implementation of the ObjectStore trait using
//! aws-sdk-s3, the transfer helper that picks single-shot vs. multipart
//! strategy, and the STS session-credential helper. It is the only crate
//! that directly depends on the AWS SDK.

pub mod client;
pub mod connect;
mod error;
pub mod sts;
pub mod transfer;

pub use client::S3Store;
pub use connect::{ConnectOptions, CredentialSource, DEFAULT_REGION};
pub use sts::SessionTokens;
pub use transfer::{Transfer, TransferConfig};
