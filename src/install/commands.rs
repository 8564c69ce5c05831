// ABOUTME: Builds the shell commands run on the remote host.
// ABOUTME: The only place where key text is interpolated into a command line.

/// Remote path of the authorized keys file, relative to the login shell's home.
pub const AUTHORIZED_KEYS: &str = "~/.ssh/authorized_keys";

const PREPARE_DIRECTORY: &str = "mkdir -p ~/.ssh && chmod 700 ~/.ssh";
const PRESENCE_CHECK: &str =
    r#"test -f ~/.ssh/authorized_keys && echo "EXISTS" || echo "NOT_EXISTS""#;
const RESTRICT_PERMISSIONS: &str = "chmod 600 ~/.ssh/authorized_keys";

/// How key text is embedded into remote commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyQuoting {
    /// POSIX single quotes with embedded quotes escaped. Key text reaches the
    /// remote file unchanged whatever characters it holds.
    #[default]
    Shell,
    /// Double quotes with no escaping, matching classic `ssh-copy-id` scripts.
    /// A key holding `"`, `$` or backticks is reinterpreted by the remote shell.
    Literal,
}

/// Whether the key line is added to an existing file or starts a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Append,
    Create,
}

/// Result of the `authorized_keys` presence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Exists,
    Missing,
}

impl Presence {
    /// Interpret the check's stdout. Anything other than the two markers is None.
    pub fn parse(stdout: &str) -> Option<Self> {
        match stdout.trim() {
            "EXISTS" => Some(Presence::Exists),
            "NOT_EXISTS" => Some(Presence::Missing),
            _ => None,
        }
    }

    pub fn write_mode(self) -> WriteMode {
        match self {
            Presence::Exists => WriteMode::Append,
            Presence::Missing => WriteMode::Create,
        }
    }
}

/// Command set for installing one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommands {
    quoting: KeyQuoting,
    quoted_key: String,
}

impl RemoteCommands {
    pub fn new(key: &str, quoting: KeyQuoting) -> Self {
        Self {
            quoting,
            quoted_key: quote(key, quoting),
        }
    }

    /// Create `~/.ssh` if needed and restrict it to the owner.
    pub fn prepare_directory(&self) -> &'static str {
        PREPARE_DIRECTORY
    }

    /// Print `EXISTS` or `NOT_EXISTS` for `authorized_keys`.
    pub fn presence_check(&self) -> &'static str {
        PRESENCE_CHECK
    }

    /// Exit 0 when the key text occurs in `authorized_keys`.
    pub fn contains_key(&self) -> String {
        match self.quoting {
            KeyQuoting::Shell => format!("grep -qF -- {} {}", self.quoted_key, AUTHORIZED_KEYS),
            KeyQuoting::Literal => format!("grep -qF {} {}", self.quoted_key, AUTHORIZED_KEYS),
        }
    }

    /// Append the key line, or replace the file with it.
    pub fn write_key(&self, mode: WriteMode) -> String {
        let redirect = match mode {
            WriteMode::Append => ">>",
            WriteMode::Create => ">",
        };
        match self.quoting {
            KeyQuoting::Shell => format!(
                "printf '%s\\n' {} {} {}",
                self.quoted_key, redirect, AUTHORIZED_KEYS
            ),
            KeyQuoting::Literal => {
                format!("echo {} {} {}", self.quoted_key, redirect, AUTHORIZED_KEYS)
            }
        }
    }

    /// Restrict `authorized_keys` to owner read/write.
    pub fn restrict_permissions(&self) -> &'static str {
        RESTRICT_PERMISSIONS
    }
}

/// Quote `key` for use as a single shell word.
pub fn quote(key: &str, quoting: KeyQuoting) -> String {
    match quoting {
        KeyQuoting::Shell => format!("'{}'", key.replace('\'', r"'\''")),
        KeyQuoting::Literal => format!("\"{}\"", key),
    }
}
