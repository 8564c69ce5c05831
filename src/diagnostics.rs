// ABOUTME: Diagnostics accumulator for non-fatal warnings during key installation.
// ABOUTME: Best-effort remote steps report here instead of failing the run.

/// Collects non-fatal warnings during an installation.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check whether a warning of `kind` was collected.
    pub fn has(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }
}

/// A non-fatal warning collected during installation.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create a `~/.ssh` setup warning.
    pub fn directory_setup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::DirectorySetup,
            message: message.into(),
        }
    }

    /// Create a key write warning.
    pub fn write(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Write,
            message: message.into(),
        }
    }

    /// Create an `authorized_keys` chmod warning.
    pub fn permission_fix(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::PermissionFix,
            message: message.into(),
        }
    }

    /// Create an SSH disconnect warning.
    pub fn ssh_disconnect(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::SshDisconnect,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// `mkdir -p ~/.ssh && chmod 700 ~/.ssh` failed; result is not checked.
    DirectorySetup,
    /// The write command exited non-zero; verification decides the outcome.
    Write,
    /// `chmod 600` on `authorized_keys` failed.
    PermissionFix,
    /// Failed to cleanly disconnect SSH session.
    SshDisconnect,
}
