//! pail-core: Core library for the pail object-storage facade
//!
//! This crate provides the SDK-independent pieces of the facade:
//! - The `ObjectStore` trait describing page-level storage primitives
//! - The `Facade` wrapper implementing the composite semantics
//!   (idempotent bucket creation, drain-then-delete, file staging)
//! - Error taxonomy shared by the adapter and the CLI
//! - Remote path parsing and profile/configuration management
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! allowing for easy testing and potential future support for other
//! backends.

pub mod config;
pub mod error;
pub mod facade;
pub mod path;
pub mod profile;
pub mod store;
pub mod types;

pub use config::{Config, ConfigManager};
pub use error::{Error, Result};
pub use facade::Facade;
pub use path::{parse_path, parse_remote, ParsedPath, RemotePath};
pub use profile::{Profile, ProfileManager};
pub use store::ObjectStore;
pub use types::{
    Bucket, ListOptions, ObjectPage, ObjectSummary, SessionCredentials, StaticCredentials,
    StoredObject, VersionPage, VersionSummary,
};
