//! Error types for the command execution core.
//!
//! External programs report failure through an exit code and free-text
//! standard error. This crate defines the closed, typed taxonomy those raw
//! signals are translated into, so callers can decide on remediation
//! (retry, prompt to remount, surface "elevated access unavailable")
//! without re-parsing shell output.

use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Output captured before an operation was denied or cancelled.
///
/// Bulk operations can make progress before failing (e.g. a recursive
/// delete that removes some entries before hitting a permission wall).
/// The lines already emitted are kept so the caller can report a
/// partial-completion result instead of discarding everything.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PartialOutput {
    /// Standard output captured up to the failure point.
    pub stdout: String,
    /// Standard error captured up to the failure point.
    pub stderr: String,
}

impl PartialOutput {
    /// Returns true when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty() && self.stderr.is_empty()
    }
}

/// Execution error taxonomy.
///
/// This set is closed: the classifier and the console boundary map every
/// raw failure onto one of these variants, and process/IO-level problems
/// never escape as untyped errors.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The external program does not exist on the target system (exit 127).
    #[error("command not found: {id}")]
    CommandNotFound {
        /// Identifier of the command definition that failed.
        id: String,
    },

    /// A path named by the command does not exist.
    #[error("no such file or directory")]
    NoSuchFileOrDirectory,

    /// The operation was denied by the kernel or the shell.
    #[error("insufficient permissions")]
    InsufficientPermissions {
        /// Output captured before the denial, when the command reports
        /// structured progress.
        partial: Option<PartialOutput>,
    },

    /// The operation wrote to a filesystem mounted read-only.
    #[error("read-only file system: {}", mount_point.display())]
    ReadOnlyFilesystem {
        /// Mount point of the filesystem the command tried to write to.
        mount_point: PathBuf,
    },

    /// The command ran but failed in a way no more specific variant covers,
    /// or the console round trip itself broke (timeout, broken pipe;
    /// reported with exit code -1).
    #[error("execution of {id} failed with exit code {exit_code}")]
    ExecutionFailed {
        /// Identifier of the command definition that failed.
        id: String,
        /// Raw exit code, or -1 when no usable status was observed.
        exit_code: i32,
    },

    /// The command exited 0 but its output could not be decoded.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A console process could not be started or recovered. For the
    /// elevated console this includes a refused trust grant.
    #[error("console allocation failed: {reason}")]
    ConsoleAlloc {
        /// Human-readable reason the console could not be brought up.
        reason: String,
    },

    /// Programmer error: a command definition and its bound arguments do
    /// not line up. Should never occur with a correctly built registry.
    #[error("invalid definition for {id}: {reason}")]
    InvalidCommandDefinition {
        /// Identifier of the offending command definition.
        id: String,
        /// What about the binding was malformed.
        reason: String,
    },
}

impl ExecError {
    /// Builds an [`ExecError::ExecutionFailed`] for a round trip that
    /// produced no usable exit status.
    pub fn no_exit_status(id: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            id: id.into(),
            exit_code: -1,
        }
    }
}

/// Error decoding the stdout of a successfully exited command.
///
/// Distinct from [`ExecError::ExecutionFailed`]: the shell round trip was
/// fine, the payload was not.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A row had the wrong number of columns for its format.
    #[error("unexpected column count in {line:?}: expected {expected}, found {found}")]
    UnexpectedColumnCount {
        /// The offending line, verbatim.
        line: String,
        /// Columns the format requires.
        expected: usize,
        /// Columns actually present.
        found: usize,
    },

    /// A field was present but not decodable.
    #[error("invalid {field} field: {value:?}")]
    InvalidField {
        /// Name of the field within the row.
        field: &'static str,
        /// The raw value that failed to decode.
        value: String,
    },

    /// The command produced no output where output was mandatory.
    #[error("empty output")]
    EmptyOutput,
}

/// Result type alias for execution-core operations.
pub type Result<T> = std::result::Result<T, ExecError>;

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
