//! SSH connection verification
//!
//! A one-shot check that a remote is reachable and its directory exists:
//! parse the remote, resolve host trust, load the identity, dial,
//! authenticate, stat the directory, close. No retries and no session reuse.

use std::sync::Arc;

use async_trait::async_trait;
use russh::client::{self, Handle};
use tracing::{debug, info};

use super::config::SshSettings;
use super::handler::SshHandler;
use super::identity::Identity;
use super::known_hosts::HostKeyPolicy;
use super::remote::RemoteAddress;
use crate::error::{MountSshfsError, Result};

/// An authenticated SSH session bound to the remote directory to check
///
/// The session is owned exclusively. Dropping a `Connection` drops the russh
/// handle, which ends the session task, so the transport is released on every
/// path including unwinding; [`Connection::close`] additionally sends a
/// disconnect message.
pub struct Connection {
    session: Handle<SshHandler>,
    directory: String,
}

impl Connection {
    /// Dial and authenticate against `remote`
    pub async fn open(remote: &RemoteAddress, settings: &SshSettings) -> Result<Self> {
        let known_hosts = settings.known_hosts_path()?;
        let policy = HostKeyPolicy::resolve(remote.host(), settings.port, &known_hosts)?;

        let identity = Identity::load(&settings.identity_path()?)?;

        let ssh_config = Arc::new(client::Config::default());
        if settings.debug {
            info!("{:?}", settings);
        }

        let addr = format!("{}:{}", remote.host(), settings.port);
        info!("Connecting to {}@{}...", remote.user(), addr);

        let mut session = client::connect(ssh_config, addr.as_str(), SshHandler::new(policy))
            .await
            .map_err(|e| match e.downcast::<MountSshfsError>() {
                Ok(trust) => trust,
                Err(e) => {
                    MountSshfsError::connection(format!("unable to connect to {:?}: {}", addr, e))
                }
            })?;

        let rsa_hash = session
            .best_supported_rsa_hash()
            .await
            .map_err(|e| MountSshfsError::connection(e.to_string()))?
            .flatten();

        let auth_result = session
            .authenticate_publickey(remote.user(), identity.into_auth_key(rsa_hash))
            .await
            .map_err(|e| MountSshfsError::connection(e.to_string()))?;

        if !auth_result.success() {
            return Err(MountSshfsError::connection(format!(
                "key authentication rejected for {}@{}",
                remote.user(),
                addr
            )));
        }

        info!("Connected to {}@{}", remote.user(), addr);

        Ok(Self {
            session,
            directory: remote.directory().to_string(),
        })
    }

    /// Remote directory this connection verifies
    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub(crate) fn session(&self) -> &Handle<SshHandler> {
        &self.session
    }

    /// Disconnect and release the session
    pub async fn close(self) {
        if let Err(e) = self
            .session
            .disconnect(russh::Disconnect::ByApplication, "", "")
            .await
        {
            debug!("Disconnect failed: {}", e);
        }
        debug!("SSH connection closed");
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("directory", &self.directory)
            .finish()
    }
}

/// Something that can confirm a remote `user@host:dir` is usable
#[async_trait]
pub trait RemoteCheck {
    /// Succeeds only if the remote directory is confirmed
    async fn check(&self, remote: &str) -> Result<()>;
}

/// Verifies a remote by connecting to it and running `stat` on its directory
#[derive(Debug, Clone, Default)]
pub struct ConnectionVerifier {
    settings: SshSettings,
}

impl ConnectionVerifier {
    /// Create a verifier with the given settings
    pub fn new(settings: SshSettings) -> Self {
        Self { settings }
    }

    /// Settings this verifier dials with
    pub fn settings(&self) -> &SshSettings {
        &self.settings
    }

    /// Parse `remote`, connect, stat its directory and close the session
    pub async fn verify(&self, remote: &str) -> Result<()> {
        let address = RemoteAddress::parse(remote)?;
        if self.settings.debug {
            info!(
                "[rhost rdir ruser] [{} {} {}]",
                address.host(),
                address.directory(),
                address.user()
            );
        }

        let connection = Connection::open(&address, &self.settings).await?;
        let result = connection.stat_directory().await;
        connection.close().await;
        result
    }
}

#[async_trait]
impl RemoteCheck for ConnectionVerifier {
    async fn check(&self, remote: &str) -> Result<()> {
        self.verify(remote).await
    }
}
