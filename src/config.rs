//! Configuration and CLI argument parsing for mount-sshfs
//!
//! Mount options come either from individual flags or from a YAML file given
//! with `--config`, which overrides every option flag.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use tracing::info;

use crate::error::{MountSshfsError, Result};
use crate::ssh::{clean_path, SshSettings};

/// mount-sshfs CLI Arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "mount-sshfs")]
#[command(version)]
#[command(about = "Validate an SSHFS mount over SSH and print the sshfs mount command")]
pub struct Args {
    /// sshfs with docker (adds -o allow_other)
    #[arg(long, env = "MOUNT_SSHFS_DOCKER")]
    pub docker: bool,

    /// Mount directory /mnt/{directory}
    #[arg(
        long = "mount-to",
        default_value = "",
        env = "MOUNT_SSHFS_MOUNT_TO",
        allow_hyphen_values = true
    )]
    pub mount_to: String,

    /// Path to the directory on the remote
    #[arg(
        long = "remote-dir",
        default_value = "",
        env = "MOUNT_SSHFS_REMOTE_DIR",
        allow_hyphen_values = true
    )]
    pub remote_dir: String,

    /// Remote host [username@]remote
    #[arg(
        long = "remote-host",
        default_value = "",
        env = "MOUNT_SSHFS_REMOTE_HOST",
        allow_hyphen_values = true
    )]
    pub remote_host: String,

    /// uid for sshfs -o idmap
    #[arg(long, default_value = "0", env = "MOUNT_SSHFS_UID")]
    pub uid: u32,

    /// gid for sshfs -o idmap
    #[arg(long, default_value = "0", env = "MOUNT_SSHFS_GID")]
    pub gid: u32,

    /// Enable root idmap
    #[arg(long, env = "MOUNT_SSHFS_ROOT")]
    pub root: bool,

    /// Configuration file
    #[arg(long, env = "MOUNT_SSHFS_CONFIG", allow_hyphen_values = true)]
    pub config: Option<PathBuf>,

    /// Private key used to verify the remote (default: ~/.ssh/id_rsa)
    #[arg(long, env = "MOUNT_SSHFS_IDENTITY", allow_hyphen_values = true)]
    pub identity: Option<PathBuf>,

    /// Known hosts file (default: ~/.ssh/known_hosts)
    #[arg(
        long = "known-hosts",
        env = "MOUNT_SSHFS_KNOWN_HOSTS",
        allow_hyphen_values = true
    )]
    pub known_hosts: Option<PathBuf>,

    /// SSH port used to verify the remote
    #[arg(long, default_value = "22", env = "MOUNT_SSHFS_PORT")]
    pub port: u16,

    /// Run the mount command instead of printing it
    #[arg(long, env = "MOUNT_SSHFS_EXEC")]
    pub exec: bool,

    /// Log connection details
    #[arg(long, env = "MOUNT_SSHFS_DEBUG")]
    pub debug: bool,
}

impl Args {
    /// Parse process arguments, accepting single-dash long flags
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_flags(std::env::args()))
    }
}

/// Long flags that take a separate value argument
const VALUE_FLAGS: &[&str] = &[
    "mount-to",
    "remote-dir",
    "remote-host",
    "uid",
    "gid",
    "config",
    "identity",
    "known-hosts",
    "port",
];

/// Rewrite single-dash long flags (`-mount-to`, `-uid=0`) as `--mount-to`
///
/// The first item (program name), short flags like `-h`, the value following
/// a flag such as `-remote-dir`, and everything after a bare `--` are left
/// alone.
///
/// # Examples
/// ```
/// use mount_sshfs::config::normalize_flags;
///
/// let args = normalize_flags(["mount-sshfs", "-uid=1000", "--root", "-h"]);
/// assert_eq!(args, ["mount-sshfs", "--uid=1000", "--root", "-h"]);
///
/// let args = normalize_flags(["mount-sshfs", "-remote-dir", "-data"]);
/// assert_eq!(args, ["mount-sshfs", "--remote-dir", "-data"]);
/// ```
pub fn normalize_flags<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    let mut expects_value = false;

    for (i, arg) in args.into_iter().enumerate() {
        let arg = arg.into();
        if i == 0 || passthrough || expects_value {
            expects_value = false;
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }

        expects_value = takes_separate_value(&arg);

        let is_long_single_dash = arg.starts_with('-')
            && !arg.starts_with("--")
            && arg.split('=').next().is_some_and(|flag| flag.len() > 2);

        if is_long_single_dash {
            out.push(format!("-{}", arg));
        } else {
            out.push(arg);
        }
    }

    out
}

/// Whether `arg` is a `-flag`/`--flag` whose value is the next argument
fn takes_separate_value(arg: &str) -> bool {
    if arg.contains('=') {
        return false;
    }
    let name = arg.trim_start_matches('-');
    name.len() < arg.len() && VALUE_FLAGS.contains(&name)
}

/// Options describing one sshfs mount
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MountOptions {
    /// uid for `-o idmap`
    #[serde(default)]
    pub uid: u32,

    /// gid for `-o idmap`
    #[serde(default)]
    pub gid: u32,

    /// Acknowledge mapping to root
    #[serde(default, rename = "root")]
    pub is_root: bool,

    /// Add `-o allow_other` for docker bind mounts
    #[serde(default, rename = "docker")]
    pub is_for_docker: bool,

    /// Local mount point
    #[serde(default, rename = "mount")]
    pub mount_dir: PathBuf,

    /// Remote as `user@host:dir`
    #[serde(default)]
    pub remote: String,
}

impl MountOptions {
    /// Build options from individual flags
    ///
    /// The remote is `remote-host:remote-dir` with the directory cleaned.
    pub fn from_flags(args: &Args) -> Self {
        Self {
            uid: args.uid,
            gid: args.gid,
            is_root: args.root,
            is_for_docker: args.docker,
            mount_dir: PathBuf::from(&args.mount_to),
            remote: format!("{}:{}", args.remote_host, clean_path(&args.remote_dir)),
        }
    }

    /// Parse options from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| MountSshfsError::config(e.to_string()))
    }

    /// Read options from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        info!("reading configuration from {}", path.display());

        let contents = std::fs::read_to_string(path).map_err(|e| {
            MountSshfsError::config(format!("unable to read {}: {}", path.display(), e))
        })?;

        Self::from_yaml(&contents)
    }
}

/// Parsed configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Mount options, from flags or the configuration file
    pub options: MountOptions,

    /// Configuration file the options were read from, if any
    pub config_file: Option<PathBuf>,

    /// Settings for verifying the remote
    pub ssh: SshSettings,

    /// Run the mount command instead of printing it
    pub exec: bool,

    /// Verbose logging
    pub debug: bool,
}

impl Config {
    /// Create Config from CLI Args
    pub fn from_args(args: Args) -> Result<Self> {
        let options = match &args.config {
            Some(path) => MountOptions::from_file(path)?,
            None => MountOptions::from_flags(&args),
        };

        let mut ssh = SshSettings::new().with_port(args.port).with_debug(args.debug);
        if let Some(identity) = args.identity {
            ssh = ssh.with_identity(identity);
        }
        if let Some(known_hosts) = args.known_hosts {
            ssh = ssh.with_known_hosts(known_hosts);
        }

        Ok(Config {
            options,
            config_file: args.config,
            ssh,
            exec: args.exec,
            debug: args.debug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(normalize_flags(
            std::iter::once("mount-sshfs").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn test_normalize_flags() {
        let args = normalize_flags([
            "mount-sshfs",
            "-mount-to",
            "/mnt/data",
            "-uid=1000",
            "--gid",
            "1000",
            "-V",
            "--",
            "-root",
        ]);
        assert_eq!(
            args,
            [
                "mount-sshfs",
                "--mount-to",
                "/mnt/data",
                "--uid=1000",
                "--gid",
                "1000",
                "-V",
                "--",
                "-root"
            ]
        );
    }

    #[test]
    fn test_normalize_flags_keeps_dashed_values() {
        let args = normalize_flags([
            "mount-sshfs",
            "-remote-dir",
            "-weird",
            "--mount-to",
            "-mnt",
            "-remote-host=-host",
            "-docker",
        ]);
        assert_eq!(
            args,
            [
                "mount-sshfs",
                "--remote-dir",
                "-weird",
                "--mount-to",
                "-mnt",
                "--remote-host=-host",
                "--docker"
            ]
        );

        let args = parse(&["-remote-dir", "-weird", "-remote-host", "alice@host"]);
        assert_eq!(args.remote_dir, "-weird");
        assert_eq!(MountOptions::from_flags(&args).remote, "alice@host:-weird");
    }

    #[test]
    fn test_go_style_flags() {
        let args = parse(&[
            "-docker",
            "-mount-to",
            "/mnt/data",
            "-remote-host",
            "alice@example.com",
            "-remote-dir",
            "/data/",
            "-uid",
            "1000",
            "-gid=1000",
        ]);

        assert!(args.docker);
        assert!(!args.root);
        assert_eq!(args.uid, 1000);
        assert_eq!(args.gid, 1000);
        assert_eq!(args.port, 22);

        let options = MountOptions::from_flags(&args);
        assert_eq!(options.remote, "alice@example.com:/data");
        assert_eq!(options.mount_dir, PathBuf::from("/mnt/data"));
    }

    #[test]
    fn test_flag_defaults() {
        let options = MountOptions::from_flags(&parse(&[]));
        assert_eq!(options.uid, 0);
        assert_eq!(options.gid, 0);
        assert!(!options.is_root);
        assert!(!options.is_for_docker);
        assert_eq!(options.remote, ":.");
    }

    #[test]
    fn test_from_yaml() {
        let options = MountOptions::from_yaml(
            "uid: 1000\ngid: 1001\nroot: false\ndocker: true\nmount: /mnt/data\nremote: alice@example.com:/data\n",
        )
        .unwrap();

        assert_eq!(
            options,
            MountOptions {
                uid: 1000,
                gid: 1001,
                is_root: false,
                is_for_docker: true,
                mount_dir: PathBuf::from("/mnt/data"),
                remote: "alice@example.com:/data".to_string(),
            }
        );
    }

    #[test]
    fn test_from_yaml_missing_keys_default() {
        let options = MountOptions::from_yaml("remote: alice@example.com:/data\n").unwrap();
        assert_eq!(options.uid, 0);
        assert!(!options.is_root);
        assert_eq!(options.mount_dir, PathBuf::new());
    }

    #[test]
    fn test_from_yaml_rejects_malformed() {
        for yaml in ["uid: not-a-number\n", "mount: [a, b\n", "unknown: 1\n"] {
            let err = MountOptions::from_yaml(yaml).unwrap_err();
            assert!(matches!(err, MountSshfsError::ConfigParse(_)), "{yaml:?}");
        }
    }

    #[test]
    fn test_flags_and_yaml_agree() {
        let from_flags = MountOptions::from_flags(&parse(&[
            "--mount-to",
            "/mnt/data",
            "--remote-host",
            "alice@example.com",
            "--remote-dir",
            "/data",
            "--uid",
            "1000",
            "--gid",
            "1000",
        ]));
        let from_yaml = MountOptions::from_yaml(
            "uid: 1000\ngid: 1000\nmount: /mnt/data\nremote: alice@example.com:/data\n",
        )
        .unwrap();
        assert_eq!(from_flags, from_yaml);
    }

    #[test]
    fn test_config_file_overrides_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "uid: 1000\ngid: 1000\nmount: /mnt/yaml\nremote: bob@host:/srv").unwrap();

        let mut args = parse(&["--mount-to", "/mnt/flags", "--uid", "5", "--debug"]);
        args.config = Some(file.path().to_path_buf());

        let config = Config::from_args(args).unwrap();
        assert_eq!(config.options.mount_dir, PathBuf::from("/mnt/yaml"));
        assert_eq!(config.options.uid, 1000);
        assert!(config.debug);
        assert!(config.ssh.debug);
        assert_eq!(config.config_file.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = parse(&[]);
        args.config = Some(dir.path().join("mount.yaml"));

        let err = Config::from_args(args).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error: "));
    }

    #[test]
    fn test_ssh_settings_from_args() {
        let config = Config::from_args(parse(&[
            "--identity",
            "/keys/id_ed25519",
            "--known-hosts",
            "/keys/known_hosts",
            "--port",
            "2222",
        ]))
        .unwrap();

        assert_eq!(config.ssh.port, 2222);
        assert_eq!(config.ssh.identity, Some(PathBuf::from("/keys/id_ed25519")));
        assert_eq!(
            config.ssh.known_hosts,
            Some(PathBuf::from("/keys/known_hosts"))
        );
        assert!(!config.exec);
        assert!(config.config_file.is_none());
    }
}
