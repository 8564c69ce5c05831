// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Positional target arguments are optional to clap but jointly required.

use clap::{ArgAction, Parser, ValueEnum};
use copyid::config::CopyIdConfig;
use copyid::install::KeyQuoting;
use copyid::output::OutputMode;
use copyid::ssh::HostKeyPolicy;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "copyid")]
#[command(about = "Copy SSH public key to a remote server")]
#[command(version, disable_help_flag = true)]
pub struct Cli {
    /// Remote server IP or FQDN
    pub hostname: Option<String>,

    /// SSH username
    pub username: Option<String>,

    /// SSH password
    pub password: Option<String>,

    /// SSH port
    pub port: Option<u16>,

    /// Path to the public key file (default: ~/.ssh/id_rsa.pub)
    #[arg(long, value_name = "PATH")]
    pub key: Option<PathBuf>,

    /// How to treat the server's host key
    #[arg(long, value_enum, default_value_t = HostKeys::AcceptAny)]
    pub host_keys: HostKeys,

    /// known_hosts file for the tofu and strict policies (default: ~/.ssh/known_hosts)
    #[arg(long, value_name = "PATH")]
    pub known_hosts: Option<PathBuf>,

    /// How the key is quoted inside remote commands
    #[arg(long, value_enum, default_value_t = Quoting::Shell)]
    pub quoting: Quoting,

    /// Timeout for each remote command, in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print only the final result
    #[arg(short, long, conflicts_with = "json")]
    pub quiet: bool,

    /// Print results as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Show this help message and exit
    #[arg(long = "h", visible_alias = "help", action = ArgAction::Help)]
    pub help: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HostKeys {
    /// Accept any host key without verification; nothing is saved
    AcceptAny,
    /// Verify against known_hosts and record unknown hosts
    Tofu,
    /// Verify against known_hosts and reject unknown hosts
    Strict,
}

impl From<HostKeys> for HostKeyPolicy {
    fn from(mode: HostKeys) -> Self {
        match mode {
            HostKeys::AcceptAny => HostKeyPolicy::AcceptAny,
            HostKeys::Tofu => HostKeyPolicy::TrustOnFirstUse,
            HostKeys::Strict => HostKeyPolicy::Strict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Quoting {
    /// Single-quote the key with embedded quotes escaped
    Shell,
    /// Wrap the key in double quotes without escaping
    Literal,
}

impl From<Quoting> for KeyQuoting {
    fn from(mode: Quoting) -> Self {
        match mode {
            Quoting::Shell => KeyQuoting::Shell,
            Quoting::Literal => KeyQuoting::Literal,
        }
    }
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }

    /// Build the installer configuration.
    ///
    /// None when any of hostname, username, password, or port is missing.
    /// Empty strings and port 0 count as missing.
    pub fn config(&self) -> Option<CopyIdConfig> {
        let hostname = self.hostname.as_deref().filter(|s| !s.is_empty())?;
        let username = self.username.as_deref().filter(|s| !s.is_empty())?;
        let password = self.password.as_deref().filter(|s| !s.is_empty())?;
        let port = self.port.filter(|&p| p != 0)?;

        let mut config = CopyIdConfig::new(hostname, username, password, port)
            .host_key_policy(self.host_keys.into())
            .quoting(self.quoting.into());

        if let Some(key) = &self.key {
            config = config.key_path(key);
        }
        if let Some(path) = &self.known_hosts {
            config = config.known_hosts_path(path);
        }
        if let Some(secs) = self.timeout {
            config = config.command_timeout(Duration::from_secs(secs));
        }
        Some(config)
    }
}
