//! SSH remote verification module
//!
//! Parses `user@host:dir` remotes and confirms them with a one-shot SSH
//! session: host key trust from `known_hosts`, public key authentication, and
//! a `stat` of the remote directory.

pub mod command;
pub mod config;
pub mod connection;
pub mod handler;
pub mod identity;
pub mod known_hosts;
pub mod remote;

#[cfg(test)]
pub(crate) mod test_keys;

// Re-exports
pub use command::CommandOutput;
pub use config::SshSettings;
pub use connection::{Connection, ConnectionVerifier, RemoteCheck};
pub use handler::SshHandler;
pub use identity::Identity;
pub use known_hosts::HostKeyPolicy;
pub use remote::{clean_path, RemoteAddress};
