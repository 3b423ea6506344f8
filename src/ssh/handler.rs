//! SSH client handler implementation
//!
//! Implements the `russh::client::Handler` trait to handle SSH connection events.

use tracing::warn;

use super::known_hosts::HostKeyPolicy;

/// SSH client handler for russh
///
/// Server host keys are checked against the resolved known hosts policy. A
/// rejected key aborts the handshake with the policy's error, which the
/// connection layer recovers by downcasting.
#[derive(Debug, Clone)]
pub struct SshHandler {
    policy: HostKeyPolicy,
}

impl SshHandler {
    /// Create a new SSH handler bound to a host key policy
    pub fn new(policy: HostKeyPolicy) -> Self {
        Self { policy }
    }
}

impl russh::client::Handler for SshHandler {
    type Error = anyhow::Error;

    /// Verify the server's host key against known hosts
    async fn check_server_key(
        &mut self,
        server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool, Self::Error> {
        match self.policy.verify(server_public_key) {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!("Rejecting host key for {}: {}", self.policy.host(), e);
                Err(e.into())
            }
        }
    }
}
