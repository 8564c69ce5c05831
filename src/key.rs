// ABOUTME: Local public key loading.
// ABOUTME: Resolves the default key path and reads the trimmed key line.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Default public key, relative to the home directory.
pub const DEFAULT_PUBLIC_KEY: &str = ".ssh/id_rsa.pub";

/// `$HOME/.ssh/id_rsa.pub` for the invoking user.
pub fn default_key_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_PUBLIC_KEY))
        .ok_or(Error::HomeDirUnavailable)
}

/// Public key text read from a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    path: PathBuf,
    line: String,
}

impl PublicKey {
    /// Read the key at `path`, trimming surrounding whitespace.
    ///
    /// Fails with [`Error::KeyNotFound`] unless `path` is a regular file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::KeyNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| Error::KeyRead {
            path: path.to_path_buf(),
            source,
        })?;

        let line = content.trim();
        if line.is_empty() {
            return Err(Error::EmptyKey(path.to_path_buf()));
        }

        tracing::debug!("loaded public key from {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            line: line.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The key line as it will appear in `authorized_keys`.
    pub fn as_str(&self) -> &str {
        &self.line
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.line)
    }
}
