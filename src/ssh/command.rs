//! Command execution over SSH
//!
//! Provides the `CommandOutput` struct and the single-channel exec used by
//! the remote directory check.

use russh::ChannelMsg;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::connection::Connection;
use crate::error::{MountSshfsError, Result};

/// Output from a command execution
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Standard output from the command
    pub stdout: String,

    /// Standard error from the command
    pub stderr: String,

    /// Exit code of the command (if the server reported one)
    pub exit_code: Option<u32>,
}

impl CommandOutput {
    /// Create a new empty CommandOutput
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the command reported exit status zero
    ///
    /// A missing exit status counts as failure.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Single-quote a string for a POSIX shell
///
/// # Examples
/// ```
/// use mount_sshfs::ssh::command::quote_for_shell;
///
/// assert_eq!(quote_for_shell("/data"), "'/data'");
/// assert_eq!(quote_for_shell("it's"), "'it'\"'\"'s'");
/// ```
pub fn quote_for_shell(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\"'\"'"))
}

/// Remote command confirming `directory` exists and is accessible
pub fn stat_command(directory: &str) -> String {
    format!("stat {}", quote_for_shell(directory))
}

impl Connection {
    /// Execute a command on a new exec channel
    ///
    /// Remote stdout and stderr are both copied to the local stderr as they
    /// arrive, and collected into the returned output.
    pub async fn exec(&self, command: &str) -> Result<CommandOutput> {
        let mut channel = self
            .session()
            .channel_open_session()
            .await
            .map_err(|e| MountSshfsError::connection(format!("Failed to open channel: {}", e)))?;

        channel
            .exec(true, command)
            .await
            .map_err(|e| MountSshfsError::connection(format!("Failed to exec command: {}", e)))?;

        let mut output = CommandOutput::new();
        let mut operator = tokio::io::stderr();

        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { data } => {
                    operator.write_all(&data).await?;
                    output.stdout.push_str(&String::from_utf8_lossy(&data));
                }
                ChannelMsg::ExtendedData { data, ext } => {
                    operator.write_all(&data).await?;
                    // ext == 1 is stderr
                    if ext == 1 {
                        output.stderr.push_str(&String::from_utf8_lossy(&data));
                    } else {
                        output.stdout.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                ChannelMsg::ExitStatus { exit_status } => {
                    output.exit_code = Some(exit_status);
                }
                ChannelMsg::Close => break,
                _ => {}
            }
        }
        operator.flush().await?;

        debug!(
            "Command completed: exit_code={:?}, stdout_len={}, stderr_len={}",
            output.exit_code,
            output.stdout.len(),
            output.stderr.len()
        );

        Ok(output)
    }

    /// Confirm the remote directory exists and is accessible
    pub async fn stat_directory(&self) -> Result<()> {
        let command = stat_command(self.directory());
        debug!("Checking remote directory: {}", command);

        let output = self.exec(&command).await?;
        if output.success() {
            return Ok(());
        }

        Err(MountSshfsError::remote(match output.exit_code {
            Some(code) => format!("`{}` exited with status {}", command, code),
            None => format!("`{}` exited without a status", command),
        }))
    }
}
