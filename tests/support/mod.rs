// ABOUTME: Test support utilities.
// ABOUTME: Provides key fixtures, an in-memory remote, and an SSH container helper.

use copyid::key::PublicKey;
use std::sync::Once;
use tempfile::TempDir;

#[allow(dead_code)]
pub mod ssh_container;

#[allow(dead_code)]
pub const TEST_KEY: &str =
    "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIAEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEB user@host";
#[allow(dead_code)]
pub const OTHER_KEY: &str =
    "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIAICAgICAgICAgICAgICAgICAgICAgICAgICAgICAgIC other@host";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("copyid=debug".parse().unwrap())
            .add_directive("russh=info".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Write `content` to `id_test.pub` in a fresh temp dir.
#[allow(dead_code)]
pub fn write_key_file(content: &str) -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("id_test.pub");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

/// Load `content` as a public key. Keep the TempDir alive while the key is used.
#[allow(dead_code)]
pub fn public_key(content: &str) -> (TempDir, PublicKey) {
    let (dir, path) = write_key_file(content);
    let key = PublicKey::load(&path).unwrap();
    (dir, key)
}
