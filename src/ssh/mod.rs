// ABOUTME: SSH client module for remote server connections.
// ABOUTME: Password authentication with an explicit host key policy.

mod client;
mod error;
mod host_key;

pub use client::{CommandOutput, RemoteShell, Session, SessionConfig};
pub use error::{Error, Result};
pub use host_key::HostKeyPolicy;
