//! Path parsing and classification
//!
//! Remote locations are written as `s3://bucket[/key]`; everything else
//! is treated as a local filesystem path.

use crate::error::{Error, Result};

/// Scheme prefix marking a remote path
const REMOTE_SCHEME: &str = "s3://";

/// A parsed remote location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePath {
    /// Bucket name
    pub bucket: String,
    /// Object key (empty for the bucket root)
    pub key: String,
}

impl RemotePath {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// The key, or an error when the path stops at the bucket root
    pub fn require_key(&self) -> Result<&str> {
        if self.key.is_empty() {
            Err(Error::InvalidPath(format!(
                "{self} names a bucket, not an object"
            )))
        } else {
            Ok(&self.key)
        }
    }

    /// Base name of the key (last `/`-separated segment)
    pub fn base_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.key.is_empty() {
            write!(f, "{REMOTE_SCHEME}{}", self.bucket)
        } else {
            write!(f, "{REMOTE_SCHEME}{}/{}", self.bucket, self.key)
        }
    }
}

/// Parsed path that can be either local or remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPath {
    /// Local filesystem path
    Local(std::path::PathBuf),
    /// Remote bucket/key location
    Remote(RemotePath),
}

impl ParsedPath {
    pub fn is_remote(&self) -> bool {
        matches!(self, ParsedPath::Remote(_))
    }

    pub fn as_remote(&self) -> Option<&RemotePath> {
        match self {
            ParsedPath::Remote(p) => Some(p),
            ParsedPath::Local(_) => None,
        }
    }

    pub fn as_local(&self) -> Option<&std::path::PathBuf> {
        match self {
            ParsedPath::Local(p) => Some(p),
            ParsedPath::Remote(_) => None,
        }
    }
}

/// Parse a path string into a ParsedPath
///
/// Anything starting with `s3://` is remote; the first segment after the
/// scheme is the bucket, the rest is the key. Everything else is local.
pub fn parse_path(path: &str) -> Result<ParsedPath> {
    if path.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }

    let Some(rest) = path.strip_prefix(REMOTE_SCHEME) else {
        return Ok(ParsedPath::Local(std::path::PathBuf::from(path)));
    };

    let (bucket, key) = match rest.split_once('/') {
        Some((bucket, key)) => (bucket, key),
        None => (rest, ""),
    };

    if !is_valid_bucket_name(bucket) {
        return Err(Error::InvalidPath(format!(
            "'{bucket}' is not a valid bucket name"
        )));
    }

    Ok(ParsedPath::Remote(RemotePath::new(bucket, key)))
}

/// Parse a path that must be remote
pub fn parse_remote(path: &str) -> Result<RemotePath> {
    match parse_path(path)? {
        ParsedPath::Remote(remote) => Ok(remote),
        ParsedPath::Local(_) => Err(Error::InvalidPath(format!(
            "'{path}' is not a remote path. Use format: {REMOTE_SCHEME}bucket[/key]"
        ))),
    }
}

/// Check bucket-name validity: 3-63 chars of lowercase alphanumerics,
/// dots and hyphens, starting and ending alphanumeric
pub fn is_valid_bucket_name(name: &str) -> bool {
    let len_ok = (3..=63).contains(&name.len());
    let chars_ok = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-');
    let ends_ok = name.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
        && name.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());
    len_ok && chars_ok && ends_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote_path() {
        let path = parse_path("s3://my-bucket/dir/file.txt").unwrap();
        assert!(path.is_remote());

        let remote = path.as_remote().unwrap();
        assert_eq!(remote.bucket, "my-bucket");
        assert_eq!(remote.key, "dir/file.txt");
    }

    #[test]
    fn test_parse_remote_bucket_only() {
        let remote = parse_remote("s3://my-bucket").unwrap();
        assert_eq!(remote.bucket, "my-bucket");
        assert_eq!(remote.key, "");
        assert!(remote.require_key().is_err());

        // a trailing slash still means the bucket root
        let remote = parse_remote("s3://my-bucket/").unwrap();
        assert_eq!(remote.key, "");
    }

    #[test]
    fn test_parse_local_paths() {
        for path in ["/tmp/file.txt", "./file.txt", "../file.txt", "file.txt"] {
            let parsed = parse_path(path).unwrap();
            assert!(!parsed.is_remote(), "{path} should be local");
            assert_eq!(parsed.as_local().unwrap().to_str().unwrap(), path);
        }
    }

    #[test]
    fn test_parse_empty_path() {
        assert!(parse_path("").is_err());
    }

    #[test]
    fn test_parse_remote_invalid_bucket() {
        assert!(parse_path("s3://UPPER/key").is_err());
        assert!(parse_path("s3://ab/key").is_err());
        assert!(parse_path("s3:///key").is_err());
        assert!(parse_path("s3://-leading/key").is_err());
    }

    #[test]
    fn test_parse_remote_rejects_local_input() {
        assert!(parse_remote("./file.txt").is_err());
    }

    #[test]
    fn test_remote_path_display() {
        let path = RemotePath::new("bucket", "key/file.txt");
        assert_eq!(path.to_string(), "s3://bucket/key/file.txt");

        let root = RemotePath::new("bucket", "");
        assert_eq!(root.to_string(), "s3://bucket");
    }

    #[test]
    fn test_remote_path_base_name() {
        assert_eq!(RemotePath::new("b", "a/b/c.txt").base_name(), "c.txt");
        assert_eq!(RemotePath::new("b", "c.txt").base_name(), "c.txt");
    }

    #[test]
    fn test_bucket_name_validation() {
        assert!(is_valid_bucket_name("my-bucket"));
        assert!(is_valid_bucket_name("my.bucket.01"));
        assert!(!is_valid_bucket_name("ab"));
        assert!(!is_valid_bucket_name("My-Bucket"));
        assert!(!is_valid_bucket_name("bucket-"));
        assert!(!is_valid_bucket_name(&"x".repeat(64)));
    }
}
