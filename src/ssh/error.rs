// ABOUTME: SSH-specific error types.
// ABOUTME: Covers connection, password authentication, host key, and command failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("authentication failed for {user}: password rejected")]
    AuthenticationFailed { user: String },

    #[error("host key for {host}:{port} rejected by {policy} policy")]
    HostKeyRejected {
        host: String,
        port: u16,
        policy: &'static str,
    },

    #[error("command execution failed: {0}")]
    CommandFailed(String),

    #[error("command timed out after {0:?}")]
    CommandTimeout(std::time::Duration),

    #[error("channel closed unexpectedly without exit status")]
    ChannelClosed,

    #[error("SSH protocol error: {0}")]
    Protocol(#[from] russh::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
