// ABOUTME: SSH session management using russh.
// ABOUTME: Handles connection, password authentication, and command execution.

use super::error::{Error, Result};
use super::host_key::HostKeyPolicy;
use async_trait::async_trait;
use russh::client::{self, AuthResult, Config, Handle, KeyboardInteractiveAuthResponse};
use russh::keys::ssh_key;
use russh::{ChannelMsg, Disconnect, MethodKind};
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for establishing an SSH session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Remote host to connect to.
    pub host: String,
    /// SSH port (default: 22).
    pub port: u16,
    /// Username for authentication.
    pub user: String,
    /// Password for authentication. May be empty.
    pub password: SecretString,
    /// How the server's host key is checked.
    pub host_key_policy: HostKeyPolicy,
    /// Optional path to known_hosts file.
    /// If None, uses the default ~/.ssh/known_hosts.
    pub known_hosts_path: Option<PathBuf>,
    /// Timeout for each remote command. None waits indefinitely.
    pub command_timeout: Option<Duration>,
}

impl SessionConfig {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        Self {
            host: host.into(),
            port: 22,
            user: user.into(),
            password: password.into(),
            host_key_policy: HostKeyPolicy::default(),
            known_hosts_path: None,
            command_timeout: None,
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
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

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }
}

/// Output from a remote command execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code of the command.
    pub exit_code: u32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// A remote shell that runs one command at a time.
///
/// The key installer only talks to the remote host through this trait.
#[async_trait]
pub trait RemoteShell: Send + Sync {
    /// Run `command` and wait for its exit status and full output.
    async fn exec(&self, command: &str) -> Result<CommandOutput>;

    /// Release the connection. Called exactly once per installer run.
    async fn close(&self) -> Result<()>;
}

/// SSH client handler for russh.
pub(crate) struct SshHandler {
    host: String,
    port: u16,
    policy: HostKeyPolicy,
    known_hosts_path: Option<PathBuf>,
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &ssh_key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        Ok(self.policy.verify(
            &self.host,
            self.port,
            server_public_key,
            self.known_hosts_path.as_deref(),
        ))
    }
}

/// An established, authenticated SSH session.
pub struct Session {
    config: SessionConfig,
    handle: Handle<SshHandler>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("handle", &"<russh::Handle>")
            .finish()
    }
}

impl Session {
    /// Connect to the remote host and authenticate with the configured password.
    pub async fn connect(config: SessionConfig) -> Result<Self> {
        let russh_config = Config {
            inactivity_timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        let handler = SshHandler {
            host: config.host.clone(),
            port: config.port,
            policy: config.host_key_policy,
            known_hosts_path: config.known_hosts_path.clone(),
        };

        tracing::debug!("connecting to {}:{}", config.host, config.port);

        let mut handle = client::connect(
            Arc::new(russh_config),
            (config.host.as_str(), config.port),
            handler,
        )
        .await
        .map_err(|e| classify_connect_error(e, &config))?;

        if !Self::authenticate(&mut handle, &config).await? {
            // Best effort: the server already refused us.
            let _ = handle
                .disconnect(Disconnect::ByApplication, "", "en")
                .await;
            return Err(Error::AuthenticationFailed {
                user: config.user.clone(),
            });
        }

        tracing::debug!("authenticated as {}@{}", config.user, config.host);

        Ok(Self { config, handle })
    }

    /// Password authentication, retried over keyboard-interactive when the
    /// server only offers that method.
    async fn authenticate(
        handle: &mut Handle<SshHandler>,
        config: &SessionConfig,
    ) -> Result<bool> {
        let password = config.password.expose_secret();

        let auth = handle
            .authenticate_password(&config.user, password)
            .await
            .map_err(Error::Protocol)?;

        if auth.success() {
            return Ok(true);
        }
        if !offers_keyboard_interactive(&auth) {
            return Ok(false);
        }

        tracing::debug!(
            "password rejected, retrying as keyboard-interactive for {}",
            config.user
        );

        let mut res = handle
            .authenticate_keyboard_interactive_start(&config.user, None::<String>)
            .await
            .map_err(Error::Protocol)?;
        loop {
            let prompts = match res {
                KeyboardInteractiveAuthResponse::Success => return Ok(true),
                KeyboardInteractiveAuthResponse::Failure { .. } => return Ok(false),
                KeyboardInteractiveAuthResponse::InfoRequest { prompts, .. } => prompts,
            };

            let Some(responses) = prompt_responses(prompts.len(), password) else {
                tracing::debug!(
                    "keyboard-interactive asked {} questions at once, giving up",
                    prompts.len()
                );
                return Ok(false);
            };

            res = handle
                .authenticate_keyboard_interactive_respond(responses)
                .await
                .map_err(Error::Protocol)?;
        }
    }

    /// Execute a command on the remote host.
    pub async fn exec(&self, command: &str) -> Result<CommandOutput> {
        match self.config.command_timeout {
            Some(timeout) => self.exec_with_timeout(command, timeout).await,
            None => self.exec_inner(command).await,
        }
    }

    /// Execute a command with a custom timeout.
    pub async fn exec_with_timeout(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<CommandOutput> {
        match tokio::time::timeout(timeout, self.exec_inner(command)).await {
            Ok(result) => result,
            Err(_) => Err(Error::CommandTimeout(timeout)),
        }
    }

    async fn exec_inner(&self, command: &str) -> Result<CommandOutput> {
        let mut channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|e| Error::CommandFailed(format!("failed to open channel: {}", e)))?;

        channel
            .exec(true, command)
            .await
            .map_err(|e| Error::CommandFailed(format!("failed to exec command: {}", e)))?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_code = 0u32;

        let mut got_exit_status = false;
        let mut got_eof = false;

        loop {
            match channel.wait().await {
                Some(ChannelMsg::Data { data }) => {
                    stdout.extend_from_slice(&data);
                }
                Some(ChannelMsg::ExtendedData { data, ext }) => {
                    if ext == 1 {
                        // stderr
                        stderr.extend_from_slice(&data);
                    }
                }
                Some(ChannelMsg::ExitStatus { exit_status }) => {
                    exit_code = exit_status;
                    got_exit_status = true;
                    if got_eof {
                        break;
                    }
                }
                Some(ChannelMsg::Eof) => {
                    got_eof = true;
                    if got_exit_status {
                        break;
                    }
                }
                Some(ChannelMsg::Close) => {
                    break;
                }
                Some(_) => {}
                None => break,
            }
        }

        if !got_exit_status {
            return Err(Error::ChannelClosed);
        }

        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&stdout).to_string(),
            stderr: String::from_utf8_lossy(&stderr).to_string(),
        })
    }

    /// Disconnect the session.
    pub async fn disconnect(&self) -> Result<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(Error::Protocol)?;
        Ok(())
    }
}

#[async_trait]
impl RemoteShell for Session {
    async fn exec(&self, command: &str) -> Result<CommandOutput> {
        Session::exec(self, command).await
    }

    async fn close(&self) -> Result<()> {
        self.disconnect().await
    }
}

/// Map a failed `client::connect` onto the SSH error taxonomy.
fn classify_connect_error(err: russh::Error, config: &SessionConfig) -> Error {
    match err {
        russh::Error::UnknownKey => Error::HostKeyRejected {
            host: config.host.clone(),
            port: config.port,
            policy: config.host_key_policy.name(),
        },
        russh::Error::IO(ref io) if io.kind() == std::io::ErrorKind::ConnectionRefused => {
            Error::Connection(format!(
                "connection refused to {}:{}",
                config.host, config.port
            ))
        }
        e => Error::Connection(e.to_string()),
    }
}

/// Whether a rejected password attempt left keyboard-interactive open.
fn offers_keyboard_interactive(auth: &AuthResult) -> bool {
    match auth {
        AuthResult::Success => false,
        AuthResult::Failure {
            remaining_methods, ..
        } => remaining_methods.contains(&MethodKind::KeyboardInteractive),
    }
}

/// Answers for one keyboard-interactive round: the password for a single
/// prompt, nothing for an empty round, None when several questions are asked.
fn prompt_responses(prompt_count: usize, password: &str) -> Option<Vec<String>> {
    match prompt_count {
        0 => Some(Vec::new()),
        1 => Some(vec![password.to_string()]),
        _ => None,
    }
}
