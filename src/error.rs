// ABOUTME: Application-wide error types for copyid.
// ABOUTME: Uses thiserror; callers branch only on the coarse ErrorCategory.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Public key file not found: {}", .0.display())]
    KeyNotFound(PathBuf),

    #[error("public key file is empty: {}", .0.display())]
    EmptyKey(PathBuf),

    #[error("failed to read public key {}: {source}", .path.display())]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot resolve default key path: home directory unknown")]
    HomeDirUnavailable,

    #[error(transparent)]
    Ssh(#[from] crate::ssh::Error),

    #[error("unexpected output from `{command}`: {output:?}")]
    UnexpectedOutput { command: String, output: String },

    #[error("key not found in ~/.ssh/authorized_keys after writing it")]
    VerificationFailed,
}

/// The distinctions a caller is allowed to make between failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The local key file is missing. Nothing touched the network.
    KeyNotFound,
    /// Everything else.
    Failure,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::KeyNotFound(_) => ErrorCategory::KeyNotFound,
            _ => ErrorCategory::Failure,
        }
    }

    /// The failure line shown for `destination` (`user@host`).
    pub fn describe(&self, destination: &str) -> String {
        match (self.category(), self) {
            (ErrorCategory::KeyNotFound, _) => self.to_string(),
            (_, Error::VerificationFailed) => format!(
                "Failed to add the key to ~/.ssh/authorized_keys for {}",
                destination
            ),
            _ => format!("An error occurred: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
