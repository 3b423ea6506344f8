//! Client identity loading
//!
//! Reads the local private key used for public key authentication.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use russh::keys::{HashAlg, PrivateKey, PrivateKeyWithHashAlg};
use tracing::info;

use crate::error::{MountSshfsError, Result};

/// Location of the current user's `~/.ssh/id_rsa`
pub fn default_identity_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".ssh").join("id_rsa"))
        .ok_or_else(|| MountSshfsError::identity("unable to determine home directory"))
}

/// A parsed private key, good for one authentication attempt
#[derive(Debug)]
pub struct Identity {
    key: PrivateKey,
}

impl Identity {
    /// Read and parse the private key at `path`
    ///
    /// Passphrase protected keys are rejected.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Reading identity from {}", path.display());

        let contents = std::fs::read_to_string(path).map_err(|e| {
            MountSshfsError::identity(format!(
                "unable to read private key {}: {}",
                path.display(),
                e
            ))
        })?;

        let key = russh::keys::decode_secret_key(&contents, None).map_err(|e| {
            MountSshfsError::identity(format!("unable to parse private key: {}", e))
        })?;

        Ok(Self { key })
    }

    /// Public half of the key, as the server will see it
    pub fn public_key(&self) -> russh::keys::PublicKey {
        self.key.public_key().clone()
    }

    /// Consume the identity into the form russh authenticates with
    ///
    /// `rsa_hash` is the signature hash negotiated with the server; it is
    /// ignored for non-RSA keys.
    pub fn into_auth_key(self, rsa_hash: Option<HashAlg>) -> PrivateKeyWithHashAlg {
        PrivateKeyWithHashAlg::new(Arc::new(self.key), rsa_hash)
    }
}
