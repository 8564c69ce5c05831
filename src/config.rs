// ABOUTME: Invocation parameters for one key installation.
// ABOUTME: Resolves the key path and derives the SSH session configuration.

use crate::error::Result;
use crate::install::KeyQuoting;
use crate::key;
use crate::ssh::{HostKeyPolicy, SessionConfig};
use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CopyIdConfig {
    pub hostname: String,
    pub username: String,
    pub password: SecretString,
    pub port: u16,
    /// Public key to install. None means `~/.ssh/id_rsa.pub`.
    pub key_path: Option<PathBuf>,
    pub host_key_policy: HostKeyPolicy,
    pub known_hosts_path: Option<PathBuf>,
    pub quoting: KeyQuoting,
    pub command_timeout: Option<Duration>,
}

impl CopyIdConfig {
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<SecretString>,
        port: u16,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            username: username.into(),
            password: password.into(),
            port,
            key_path: None,
            host_key_policy: HostKeyPolicy::default(),
            known_hosts_path: None,
            quoting: KeyQuoting::default(),
            command_timeout: None,
        }
    }

    pub fn key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_path = Some(path.into());
        self
    }

    pub fn host_key_policy(mut self, policy: HostKeyPolicy) -> Self {
        self.host_key_policy = policy;
        self
    }

    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    pub fn quoting(mut self, quoting: KeyQuoting) -> Self {
        self.quoting = quoting;
        self
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    /// `user@host`, as shown in outcome messages.
    pub fn destination(&self) -> String {
        format!("{}@{}", self.username, self.hostname)
    }

    /// The explicit key path, or the default under the home directory.
    pub fn resolved_key_path(&self) -> Result<PathBuf> {
        match &self.key_path {
            Some(path) => Ok(path.clone()),
            None => key::default_key_path(),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::new(
            self.hostname.as_str(),
            self.username.as_str(),
            self.password.clone(),
        )
        .port(self.port)
        .host_key_policy(self.host_key_policy);

        if let Some(path) = &self.known_hosts_path {
            config = config.known_hosts_path(path);
        }
        if let Some(timeout) = self.command_timeout {
            config = config.command_timeout(timeout);
        }
        config
    }
}
