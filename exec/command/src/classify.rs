//! Exit code and stderr heuristics.
//!
//! External utilities do not return structured errors; failure semantics
//! have to be inferred from the exit code plus free-text stderr. The
//! heuristics live behind [`ErrorClassifier`] so the pattern table can be
//! swapped or extended without touching callers, since substring matching
//! is wording- and locale-dependent by nature.

use std::path::Path;

use explorer_error::ExecError;
use explorer_error::Result;

use crate::invocation::CommandInvocation;
use crate::mount::mount_point_of;

const NO_SUCH_FILE: &str = "No such file or directory";
const USAGE: &str = "Usage:";
const PERMISSION_DENIED: &str = "Permission denied";
const NOT_PERMITTED: &str = "Operation not permitted";
const READ_ONLY_FS: &str = "Read-only file system";

/// Exit code busybox/toybox shells report for an unknown program.
const EXIT_COMMAND_NOT_FOUND: i32 = 127;
/// Exit code conventionally meaning "no usable exit status".
const EXIT_NO_STATUS: i32 = 255;

/// Decides whether a completed invocation succeeded, and if not, which
/// typed error applies.
pub trait ErrorClassifier {
    /// On success returns the raw stdout, untouched; otherwise the typed
    /// error inferred from the exit code and stderr.
    fn classify<'a>(&self, invocation: &'a CommandInvocation) -> Result<&'a str>;
}

/// The historical substring-priority classifier.
///
/// Rules are checked in order, first match wins. Matching is substring
/// and case-sensitive against the full accumulated stderr buffer, not
/// line-anchored, because root-invoked utilities may prefix or wrap the
/// underlying message.
///
/// Rule 4 maps a `Usage:` message to `NoSuchFileOrDirectory`: a malformed
/// invocation against a missing path historically surfaced as a usage
/// message and was treated identically to a missing-path error. Imprecise,
/// but kept for compatibility.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrPatternClassifier;

impl ErrorClassifier for StderrPatternClassifier {
    fn classify<'a>(&self, invocation: &'a CommandInvocation) -> Result<&'a str> {
        let spec = invocation.spec();
        let Some(exit_code) = invocation.exit_code() else {
            return Err(ExecError::no_exit_status(spec.id));
        };
        let stderr = invocation.stderr();
        if exit_code != 0 {
            tracing::debug!(id = spec.id, exit_code, "classifying failed invocation");
        }

        if exit_code == EXIT_COMMAND_NOT_FOUND {
            return Err(ExecError::CommandNotFound {
                id: spec.id.to_string(),
            });
        }
        if exit_code == EXIT_NO_STATUS {
            return Err(ExecError::ExecutionFailed {
                id: spec.id.to_string(),
                exit_code,
            });
        }
        if exit_code != 0 && stderr.contains(NO_SUCH_FILE) {
            return Err(ExecError::NoSuchFileOrDirectory);
        }
        if exit_code != 0 && stderr.contains(USAGE) {
            return Err(ExecError::NoSuchFileOrDirectory);
        }
        if exit_code != 0 && (stderr.contains(PERMISSION_DENIED) || stderr.contains(NOT_PERMITTED))
        {
            let partial = (spec.structured_output && !invocation.stdout().is_empty())
                .then(|| invocation.partial_output());
            return Err(ExecError::InsufficientPermissions { partial });
        }
        if exit_code != 0 && stderr.contains(READ_ONLY_FS) {
            let mount_point = spec
                .writable_arg
                .and_then(|idx| invocation.args().get(idx))
                .and_then(|target| mount_point_of(Path::new(target)));
            return match mount_point {
                Some(mount_point) => Err(ExecError::ReadOnlyFilesystem { mount_point }),
                None => Err(ExecError::ExecutionFailed {
                    id: spec.id.to_string(),
                    exit_code,
                }),
            };
        }
        if exit_code != 0 {
            return Err(ExecError::ExecutionFailed {
                id: spec.id.to_string(),
                exit_code,
            });
        }

        Ok(invocation.stdout())
    }
}

#[cfg(test)]
#[path = "classify.test.rs"]
mod tests;
