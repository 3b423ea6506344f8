//! Error types for mount-sshfs

use thiserror::Error;

/// Main error type for mount-sshfs
#[derive(Debug, Error)]
pub enum MountSshfsError {
    /// Remote string is not of the form `user@host:dir`
    #[error("Invalid remote: {0}")]
    InvalidRemoteFormat(String),

    /// Known hosts store missing, malformed, or host key not trusted
    #[error("Host key error: {0}")]
    HostTrust(String),

    /// Private key could not be read or parsed
    #[error("Identity error: {0}")]
    Identity(String),

    /// Dialing or authenticating against the remote failed
    #[error("SSH connection error: {0}")]
    Connection(String),

    /// The remote directory could not be confirmed
    #[error("Unable to verify remote: {0}")]
    RemoteVerification(String),

    /// uid or gid maps to root without the root acknowledgement
    #[error("uid is 0 or gid is 0 and -root flag is not set")]
    PrivilegeSafety,

    /// Local mount point is neither an existing path nor creatable
    #[error("invalid mount dir path: {0}")]
    LocalPath(String),

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    ConfigParse(String),

    /// The mount helper could not be run or exited unsuccessfully
    #[error("Mount failed: {0}")]
    Mount(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using MountSshfsError
pub type Result<T> = std::result::Result<T, MountSshfsError>;

impl MountSshfsError {
    /// Create an invalid remote error from a string
    pub fn invalid_remote(msg: impl Into<String>) -> Self {
        MountSshfsError::InvalidRemoteFormat(msg.into())
    }

    /// Create a host trust error from a string
    pub fn host_trust(msg: impl Into<String>) -> Self {
        MountSshfsError::HostTrust(msg.into())
    }

    /// Create an identity error from a string
    pub fn identity(msg: impl Into<String>) -> Self {
        MountSshfsError::Identity(msg.into())
    }

    /// Create a connection error from a string
    pub fn connection(msg: impl Into<String>) -> Self {
        MountSshfsError::Connection(msg.into())
    }

    /// Create a remote verification error from a string
    pub fn remote(msg: impl Into<String>) -> Self {
        MountSshfsError::RemoteVerification(msg.into())
    }

    /// Create a configuration error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        MountSshfsError::ConfigParse(msg.into())
    }
}
