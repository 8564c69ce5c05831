// ABOUTME: The key installation flow: read key, connect, update authorized_keys, close.
// ABOUTME: Each step runs strictly after the previous one over a single session.

mod commands;

pub use commands::{AUTHORIZED_KEYS, KeyQuoting, Presence, RemoteCommands, WriteMode, quote};

use crate::config::CopyIdConfig;
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{Error, Result};
use crate::key::PublicKey;
use crate::ssh::{RemoteShell, Session};

/// What a successful run did to the remote `authorized_keys`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The key was already listed; nothing was written.
    AlreadyPresent,
    /// The key line was written. `created` is true when the file was new.
    Installed { created: bool },
}

impl Outcome {
    /// The outcome line shown for `destination` (`user@host`).
    pub fn describe(&self, destination: &str) -> String {
        match self {
            Outcome::AlreadyPresent => format!(
                "The key already exists in {} for {}",
                AUTHORIZED_KEYS, destination
            ),
            Outcome::Installed { .. } => {
                format!("Public key successfully copied to {}", destination)
            }
        }
    }
}

/// Install the configured public key on the configured host.
///
/// The key file is read before any connection is attempted. Once connected,
/// the session is closed whatever the outcome.
pub async fn copy_id(config: &CopyIdConfig, diag: &mut Diagnostics) -> Result<Outcome> {
    let key = PublicKey::load(config.resolved_key_path()?)?;

    let session = Session::connect(config.session_config()).await?;

    install_and_close(&session, &key, config.quoting, diag).await
}

/// Run [`install_key`] and then close `remote`, on every path.
pub async fn install_and_close<R: RemoteShell + ?Sized>(
    remote: &R,
    key: &PublicKey,
    quoting: KeyQuoting,
    diag: &mut Diagnostics,
) -> Result<Outcome> {
    let result = install_key(remote, key, quoting, diag).await;

    // Disconnect failure never changes the outcome
    if let Err(e) = remote.close().await {
        diag.warn(Warning::ssh_disconnect(format!("SSH disconnect failed: {}", e)));
    }

    result
}

/// Ensure `key` is listed in the remote `authorized_keys`.
pub async fn install_key<R: RemoteShell + ?Sized>(
    remote: &R,
    key: &PublicKey,
    quoting: KeyQuoting,
    diag: &mut Diagnostics,
) -> Result<Outcome> {
    let commands = RemoteCommands::new(key.as_str(), quoting);

    prepare_directory(remote, &commands, diag).await;

    tracing::debug!("checking for {}", AUTHORIZED_KEYS);
    let check = remote.exec(commands.presence_check()).await?;
    let presence = Presence::parse(&check.stdout).ok_or_else(|| Error::UnexpectedOutput {
        command: commands.presence_check().to_string(),
        output: check.stdout.clone(),
    })?;

    if presence == Presence::Exists && contains_key(remote, &commands).await? {
        tracing::debug!("key already present in {}", AUTHORIZED_KEYS);
        return Ok(Outcome::AlreadyPresent);
    }

    let mode = presence.write_mode();
    tracing::debug!("writing key to {} ({:?})", AUTHORIZED_KEYS, mode);
    let written = remote.exec(&commands.write_key(mode)).await?;
    if !written.success() {
        diag.warn(Warning::write(format!(
            "writing {} exited with status {}: {}",
            AUTHORIZED_KEYS,
            written.exit_code,
            written.stderr.trim()
        )));
    }

    let restricted = remote.exec(commands.restrict_permissions()).await?;
    if !restricted.success() {
        diag.warn(Warning::permission_fix(format!(
            "chmod 600 {} exited with status {}: {}",
            AUTHORIZED_KEYS,
            restricted.exit_code,
            restricted.stderr.trim()
        )));
    }

    if !contains_key(remote, &commands).await? {
        return Err(Error::VerificationFailed);
    }

    Ok(Outcome::Installed {
        created: presence == Presence::Missing,
    })
}

/// Create `~/.ssh` with mode 700. Best effort: the result is recorded, never acted on.
async fn prepare_directory<R: RemoteShell + ?Sized>(
    remote: &R,
    commands: &RemoteCommands,
    diag: &mut Diagnostics,
) {
    match remote.exec(commands.prepare_directory()).await {
        Ok(output) if output.success() => {}
        Ok(output) => diag.warn(Warning::directory_setup(format!(
            "preparing ~/.ssh exited with status {}: {}",
            output.exit_code,
            output.stderr.trim()
        ))),
        Err(e) => diag.warn(Warning::directory_setup(format!(
            "preparing ~/.ssh failed: {}",
            e
        ))),
    }
}

async fn contains_key<R: RemoteShell + ?Sized>(
    remote: &R,
    commands: &RemoteCommands,
) -> Result<bool> {
    Ok(remote.exec(&commands.contains_key()).await?.success())
}
