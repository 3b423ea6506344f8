//! sshfs command rendering
//!
//! Turns validated mount options into the `sudo sshfs` invocation, either as
//! shell text for the operator or as a process to run directly.

use tokio::process::Command;
use tracing::info;

use crate::config::MountOptions;
use crate::error::{MountSshfsError, Result};

/// Privilege helper the mount runs under
pub const SUDO: &str = "sudo";

/// Mount utility
pub const SSHFS: &str = "sshfs";

/// The `-o` option groups, in command order
fn mount_options(options: &MountOptions) -> Vec<String> {
    let mut groups = vec![format!(
        "idmap=user,uid={},gid={}",
        options.uid, options.gid
    )];
    if options.is_for_docker {
        groups.push("allow_other".to_string());
    }
    groups
}

/// Arguments passed to `sudo`, starting with `sshfs`
pub fn mount_args(options: &MountOptions) -> Vec<String> {
    let mut args = vec![SSHFS.to_string()];
    for group in mount_options(options) {
        args.push("-o".to_string());
        args.push(group);
    }
    args.push(options.remote.clone());
    args.push(options.mount_dir.display().to_string());
    args
}

/// Render the mount command as multi-line shell text
///
/// # Examples
/// ```
/// use std::path::PathBuf;
/// use mount_sshfs::config::MountOptions;
/// use mount_sshfs::emit::render;
///
/// let options = MountOptions {
///     uid: 1000,
///     gid: 1000,
///     is_root: false,
///     is_for_docker: false,
///     mount_dir: PathBuf::from("/mnt/data"),
///     remote: "alice@example.com:/data".to_string(),
/// };
/// assert_eq!(
///     render(&options),
///     "sudo sshfs \\\n\t-o idmap=user,uid=1000,gid=1000 \\\n\talice@example.com:/data \\\n\t/mnt/data\n"
/// );
/// ```
pub fn render(options: &MountOptions) -> String {
    let mut lines = vec![format!("{} {}", SUDO, SSHFS)];
    lines.extend(
        mount_options(options)
            .into_iter()
            .map(|group| format!("\t-o {}", group)),
    );
    lines.push(format!("\t{}", options.remote));
    lines.push(format!("\t{}", options.mount_dir.display()));

    let mut text = lines.join(" \\\n");
    text.push('\n');
    text
}

/// Run the mount command, waiting for it to finish
pub async fn execute(options: &MountOptions) -> Result<()> {
    let args = mount_args(options);
    info!("Running {} {}", SUDO, args.join(" "));

    let status = Command::new(SUDO)
        .args(&args)
        .status()
        .await
        .map_err(|e| MountSshfsError::Mount(format!("unable to run {}: {}", SUDO, e)))?;

    if !status.success() {
        return Err(MountSshfsError::Mount(format!("{} exited with {}", SSHFS, status)));
    }

    info!("Mounted {} on {}", options.remote, options.mount_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn options(is_for_docker: bool) -> MountOptions {
        MountOptions {
            uid: 1000,
            gid: 1000,
            is_root: false,
            is_for_docker,
            mount_dir: PathBuf::from("/mnt/data"),
            remote: "alice@example.com:/data".to_string(),
        }
    }

    #[test]
    fn test_render_without_docker() {
        let text = render(&options(false));
        assert!(text.contains("idmap=user,uid=1000,gid=1000"));
        assert!(text.contains("alice@example.com:/data"));
        assert!(text.contains("/mnt/data"));
        assert!(!text.contains("allow_other"));
    }

    #[test]
    fn test_render_with_docker() {
        assert_eq!(
            render(&options(true)),
            "sudo sshfs \\\n\
             \t-o idmap=user,uid=1000,gid=1000 \\\n\
             \t-o allow_other \\\n\
             \talice@example.com:/data \\\n\
             \t/mnt/data\n"
        );
    }

    #[test]
    fn test_flags_and_yaml_render_identically() {
        use crate::config::{normalize_flags, Args};
        use clap::Parser;

        let args = Args::parse_from(normalize_flags([
            "mount-sshfs",
            "-docker",
            "-mount-to",
            "/mnt/data",
            "-remote-host",
            "alice@example.com",
            "-remote-dir",
            "/data/",
            "-uid",
            "1000",
            "-gid",
            "1000",
        ]));
        let from_flags = MountOptions::from_flags(&args);
        let from_yaml = MountOptions::from_yaml(
            "uid: 1000\ngid: 1000\ndocker: true\nmount: /mnt/data\nremote: alice@example.com:/data\n",
        )
        .unwrap();

        assert_eq!(render(&from_flags), render(&from_yaml));
    }

    #[test]
    fn test_mount_args_match_render() {
        let opts = options(true);
        assert_eq!(
            mount_args(&opts),
            [
                "sshfs",
                "-o",
                "idmap=user,uid=1000,gid=1000",
                "-o",
                "allow_other",
                "alice@example.com:/data",
                "/mnt/data"
            ]
        );

        let flat = render(&opts).replace(" \\\n\t", " ");
        assert_eq!(flat.trim_end(), format!("{} {}", SUDO, mount_args(&opts).join(" ")));
    }
}
