//! mount-sshfs - Entry point
//!
//! Parses flags or the configuration file, validates the mount against the
//! remote, then prints (or runs) the sshfs command.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

use mount_sshfs::config::{Args, Config};
use mount_sshfs::emit;
use mount_sshfs::error::Result;
use mount_sshfs::ssh::ConnectionVerifier;
use mount_sshfs::validate::{ValidatedMount, Validator};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse_normalized();

    // Logs go to stderr; stdout carries only the mount command
    let level = if args.debug { "debug" } else { "info" };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let (config, mount) = match validate(args).await {
        Ok(validated) => validated,
        Err(e) => {
            // Printed directly so a RUST_LOG filter cannot hide it
            eprintln!("Invalid flags: {}", e);
            std::process::exit(1);
        }
    };

    if config.exec {
        if let Err(e) = emit::execute(mount.options()).await {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    } else {
        print!("{}", emit::render(mount.options()));
    }
}

async fn validate(args: Args) -> Result<(Config, ValidatedMount)> {
    let config = Config::from_args(args)?;
    let validator = Validator::new(ConnectionVerifier::new(config.ssh.clone()));
    let mount = validator.validate_config(&config).await?;
    Ok((config, mount))
}
