//! SSH settings for the connection verifier
//!
//! Where to find the identity and the known hosts store, which port to dial,
//! and whether to log connection details.

use std::path::PathBuf;

use super::identity::default_identity_path;
use super::known_hosts::default_known_hosts_path;
use crate::error::Result;

/// Default SSH port
pub const DEFAULT_SSH_PORT: u16 = 22;

/// SSH verification settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshSettings {
    /// SSH port (default: 22)
    pub port: u16,

    /// Private key path; `~/.ssh/id_rsa` when unset
    pub identity: Option<PathBuf>,

    /// Known hosts path; `~/.ssh/known_hosts` when unset
    pub known_hosts: Option<PathBuf>,

    /// Log parsed remote fields and client settings
    pub debug: bool,
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_SSH_PORT,
            identity: None,
            known_hosts: None,
            debug: false,
        }
    }
}

impl SshSettings {
    /// Settings with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SSH port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Use a specific private key file
    pub fn with_identity(mut self, path: impl Into<PathBuf>) -> Self {
        self.identity = Some(path.into());
        self
    }

    /// Use a specific known hosts file
    pub fn with_known_hosts(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts = Some(path.into());
        self
    }

    /// Enable debug logging in the verifier
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Resolved private key path
    pub fn identity_path(&self) -> Result<PathBuf> {
        match &self.identity {
            Some(path) => Ok(path.clone()),
            None => default_identity_path(),
        }
    }

    /// Resolved known hosts path
    pub fn known_hosts_path(&self) -> Result<PathBuf> {
        match &self.known_hosts {
            Some(path) => Ok(path.clone()),
            None => default_known_hosts_path(),
        }
    }
}
