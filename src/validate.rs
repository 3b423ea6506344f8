//! Mount option validation
//!
//! Checks run in a fixed order and stop at the first failure:
//! root mapping acknowledgement, then the local mount point, then the remote.
//! The local checks never touch the network.

use std::fs::OpenOptions;
use std::path::Path;

use tracing::debug;

use crate::config::{Config, MountOptions};
use crate::error::{MountSshfsError, Result};
use crate::ssh::RemoteCheck;

/// Reserved id for root
pub const ROOT_ID: u32 = 0;

/// Mount options that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMount(MountOptions);

impl ValidatedMount {
    /// The validated options
    pub fn options(&self) -> &MountOptions {
        &self.0
    }
}

/// Validates mount options against a remote check
#[derive(Debug)]
pub struct Validator<R> {
    remote: R,
}

impl<R: RemoteCheck + Sync> Validator<R> {
    /// Create a validator using `remote` for the reachability check
    pub fn new(remote: R) -> Self {
        Self { remote }
    }

    /// The remote check in use
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Validate `options`, stopping at the first failed check
    pub async fn validate(&self, options: &MountOptions) -> Result<ValidatedMount> {
        check_root_mapping(options)?;
        check_mount_dir(&options.mount_dir)?;

        self.remote
            .check(&options.remote)
            .await
            .map_err(|e| match e {
                MountSshfsError::RemoteVerification(_) => e,
                other => MountSshfsError::remote(other.to_string()),
            })?;

        Ok(ValidatedMount(options.clone()))
    }

    /// Validate the options of a loaded `config`
    ///
    /// When the options came from a configuration file, failures are
    /// reported as configuration errors.
    pub async fn validate_config(&self, config: &Config) -> Result<ValidatedMount> {
        let result = self.validate(&config.options).await;
        match (&config.config_file, result) {
            (Some(path), Err(e)) => {
                debug!("{} failed validation", path.display());
                Err(MountSshfsError::config(e.to_string()))
            }
            (_, result) => result,
        }
    }
}

/// Reject uid or gid 0 unless root mapping was acknowledged
pub fn check_root_mapping(options: &MountOptions) -> Result<()> {
    if !options.is_root && (options.uid == ROOT_ID || options.gid == ROOT_ID) {
        return Err(MountSshfsError::PrivilegeSafety);
    }
    Ok(())
}

/// Check the local mount point is usable
///
/// An existing directory is accepted. A missing path is accepted if a
/// zero-length file can be created there; the file is removed again at once.
/// Anything else, including an existing regular file, is rejected.
pub fn check_mount_dir(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            return Err(MountSshfsError::LocalPath(format!(
                "{} exists and is not a directory",
                path.display()
            )))
        }
        Err(e) => debug!("{} not found ({}), trying a write", path.display(), e),
    }

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| MountSshfsError::LocalPath(format!("{}: {}", path.display(), e)))?;

    std::fs::remove_file(path)
        .map_err(|e| MountSshfsError::LocalPath(format!("{}: {}", path.display(), e)))?;

    Ok(())
}
