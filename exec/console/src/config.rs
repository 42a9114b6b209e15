//! Console configuration.

use serde::Deserialize;

/// Environment variable overriding the unprivileged shell binary.
pub const SHELL_ENV: &str = "EXPLORER_SHELL";

/// Environment variable overriding the elevation wrapper binary.
pub const ELEVATION_ENV: &str = "EXPLORER_SU";

const DEFAULT_SHELL: &str = "sh";
const DEFAULT_ELEVATION: &str = "su";
const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 120;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CANCEL_GRACE_MS: u64 = 500;

/// Settings shared by every console a manager creates.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Binary spawned for the unprivileged console.
    pub shell_program: String,
    /// Binary spawned for the elevated console. Starting it may prompt an
    /// external trust grant.
    pub elevation_program: String,
    /// Bound on one command's round trip. On expiry the console is torn
    /// down; a stuck console can never again find a sentinel boundary.
    pub command_timeout_secs: u64,
    /// Bound on the open-time probe. Generous enough for an elevation
    /// prompt to be answered.
    pub probe_timeout_secs: u64,
    /// How long a cancelled invocation may keep running before the
    /// process is killed.
    pub cancel_grace_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            shell_program: DEFAULT_SHELL.to_string(),
            elevation_program: DEFAULT_ELEVATION.to_string(),
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            cancel_grace_ms: DEFAULT_CANCEL_GRACE_MS,
        }
    }
}

impl ConsoleConfig {
    /// Defaults with the shell binaries overridable from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(shell) = std::env::var(SHELL_ENV)
            && !shell.is_empty()
        {
            config.shell_program = shell;
        }
        if let Ok(elevation) = std::env::var(ELEVATION_ENV)
            && !elevation.is_empty()
        {
            config.elevation_program = elevation;
        }
        config
    }
}

#[cfg(test)]
#[path = "config.test.rs"]
mod tests;
