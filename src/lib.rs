//! mount-sshfs - validate an SSHFS mount and emit the mount command
//!
//! Given a local mount point and a remote of the form `user@host:dir`, this
//! crate checks that mapping to root was acknowledged, that the mount point is
//! usable, and that the remote directory can be reached over SSH, and then
//! renders the `sudo sshfs` command that performs the mount.
//!
//! # Verification
//!
//! The remote check is a single SSH session: the host key must already be in
//! `~/.ssh/known_hosts`, authentication uses `~/.ssh/id_rsa`, and `stat` is
//! run on the remote directory. The session is closed before the command is
//! emitted; the mount itself is done by `sshfs`.
//!
//! # Example Usage (CLI)
//!
//! ```bash
//! mount-sshfs -remote-host alice@example.com -remote-dir /data \
//!   -mount-to /mnt/data -uid 1000 -gid 1000
//! mount-sshfs -config mount.yaml
//! ```

pub mod config;
pub mod emit;
pub mod error;
pub mod ssh;
pub mod validate;

// Re-exports for convenience
pub use config::{Args, Config, MountOptions};
pub use error::{MountSshfsError, Result};
pub use ssh::{ConnectionVerifier, RemoteAddress, RemoteCheck, SshSettings};
pub use validate::{ValidatedMount, Validator};
