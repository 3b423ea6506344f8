//! Remote address parsing
//!
//! Splits a `user@host:dir` string into its parts. No network or filesystem
//! access happens here, so a malformed remote is rejected before any dial.

use std::fmt;
use std::str::FromStr;

use crate::error::{MountSshfsError, Result};

/// A parsed `user@host:dir` remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAddress {
    user: String,
    host: String,
    directory: String,
}

impl RemoteAddress {
    /// Parse a remote of the form `user@host:dir`
    ///
    /// The string must contain exactly one `@`, and the part after it exactly
    /// one `:`. User, host and directory must all be non-empty. The directory
    /// is lexically cleaned, so `/data/` and `/data` parse identically.
    ///
    /// # Examples
    /// ```
    /// use mount_sshfs::ssh::RemoteAddress;
    ///
    /// let remote = RemoteAddress::parse("alice@example.com:/data").unwrap();
    /// assert_eq!(remote.user(), "alice");
    /// assert_eq!(remote.host(), "example.com");
    /// assert_eq!(remote.directory(), "/data");
    ///
    /// assert!(RemoteAddress::parse("bob@host").is_err());
    /// ```
    pub fn parse(remote: &str) -> Result<Self> {
        let at_fields: Vec<&str> = remote.split('@').collect();
        if at_fields.len() != 2 {
            return Err(MountSshfsError::invalid_remote(format!(
                "{:?} must contain exactly one '@'",
                remote
            )));
        }

        // [host, dir, user, host:dir]
        let mut fields: Vec<&str> = at_fields[1].split(':').collect();
        fields.extend_from_slice(&at_fields);
        if fields.len() != 4 {
            return Err(MountSshfsError::invalid_remote(format!(
                "{:?} is not of the form user@host:dir",
                remote
            )));
        }

        let (host, directory, user) = (fields[0], fields[1], fields[2]);
        if user.is_empty() || host.is_empty() || directory.is_empty() {
            return Err(MountSshfsError::invalid_remote(format!(
                "{:?} has an empty user, host or directory",
                remote
            )));
        }

        Ok(Self {
            user: user.to_string(),
            host: host.to_string(),
            directory: clean_path(directory),
        })
    }

    /// Remote login name
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Remote host name or address
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Cleaned remote directory
    pub fn directory(&self) -> &str {
        &self.directory
    }
}

impl FromStr for RemoteAddress {
    type Err = MountSshfsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RemoteAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.user, self.host, self.directory)
    }
}

/// Lexically clean a slash-separated path
///
/// Collapses repeated separators, drops `.` elements, resolves `..` against
/// the preceding element and strips any trailing slash. An empty path cleans
/// to `.`. `..` never climbs above the root of an absolute path.
///
/// # Examples
/// ```
/// use mount_sshfs::ssh::clean_path;
///
/// assert_eq!(clean_path("/data/"), "/data");
/// assert_eq!(clean_path("a//b/./c/.."), "a/b");
/// assert_eq!(clean_path(""), ".");
/// ```
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if rooted {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}
