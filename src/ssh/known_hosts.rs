//! Host key trust
//!
//! Loads an OpenSSH `known_hosts` store and turns it into a policy the russh
//! client handler consults during key exchange. Unknown hosts and changed
//! keys are both rejected; there is no accept-all fallback.

use std::path::{Path, PathBuf};

use ssh_key::known_hosts::KnownHosts;
use tracing::debug;

use crate::error::{MountSshfsError, Result};

/// Location of the current user's `~/.ssh/known_hosts`
pub fn default_known_hosts_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".ssh").join("known_hosts"))
        .ok_or_else(|| MountSshfsError::host_trust("unable to determine home directory"))
}

/// Host key verification policy for a single host
#[derive(Debug, Clone)]
pub struct HostKeyPolicy {
    host: String,
    port: u16,
    path: PathBuf,
}

impl HostKeyPolicy {
    /// Load the trust store at `path` for `host:port`
    ///
    /// Fails if the store does not exist or contains a line that is not a
    /// valid known hosts entry.
    pub fn resolve(host: &str, port: u16, path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(MountSshfsError::host_trust(format!(
                "known hosts file {} not found",
                path.display()
            )));
        }

        let entries = KnownHosts::read_file(path).map_err(|e| {
            MountSshfsError::host_trust(format!("unable to parse {}: {}", path.display(), e))
        })?;

        debug!(
            "Loaded {} known host entries from {}",
            entries.len(),
            path.display()
        );

        Ok(Self {
            host: host.to_string(),
            port,
            path: path.to_path_buf(),
        })
    }

    /// Check a server host key against the store
    pub fn verify(&self, server_key: &russh::keys::PublicKey) -> Result<()> {
        match russh::keys::check_known_hosts_path(&self.host, self.port, server_key, &self.path)
        {
            Ok(true) => {
                debug!("Host key for {} found in {}", self.host, self.path.display());
                Ok(())
            }
            Ok(false) => Err(MountSshfsError::host_trust(format!(
                "no host key for {} in {}",
                self.host,
                self.path.display()
            ))),
            Err(russh::keys::Error::KeyChanged { line }) => {
                Err(MountSshfsError::host_trust(format!(
                    "host key for {} does not match {}:{}",
                    self.host,
                    self.path.display(),
                    line
                )))
            }
            Err(e) => Err(MountSshfsError::host_trust(e.to_string())),
        }
    }

    /// Host this policy was resolved for
    pub fn host(&self) -> &str {
        &self.host
    }
}
