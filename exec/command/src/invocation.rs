//! A bound, executable instance of a command.

use explorer_error::ExecError;
use explorer_error::PartialOutput;
use explorer_error::Result;

use crate::spec::CommandSpec;

/// Lifecycle of an invocation.
///
/// `Created → Dispatched → (Completed | PartiallyCompleted | Cancelled)`.
/// The three rightmost states are terminal; captured output and the exit
/// code never change once one of them is reached, and a terminal
/// invocation can never be dispatched again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvocationState {
    /// Bound but not yet handed to a console.
    Created,
    /// In flight on exactly one console.
    Dispatched,
    /// Round trip finished; exit code and both buffers are final.
    Completed,
    /// Cancelled after producing some output. The buffers hold whatever
    /// the command emitted before termination.
    PartiallyCompleted,
    /// Cancelled before producing any output.
    Cancelled,
}

impl InvocationState {
    /// Returns true once the invocation can no longer change.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::PartiallyCompleted | Self::Cancelled
        )
    }
}

/// One materialized command, ready to be written to a console.
///
/// Owned by the caller that bound it; handed by `&mut` to a console for
/// the duration of one `execute` round trip. The sentinel is assigned at
/// dispatch, which ties the invocation to that console's stream state;
/// it cannot be replayed elsewhere without re-binding.
#[derive(Debug)]
pub struct CommandInvocation {
    spec: &'static CommandSpec,
    args: Vec<String>,
    command_text: String,
    sentinel: Option<String>,
    stdout: String,
    stderr: String,
    exit_code: Option<i32>,
    state: InvocationState,
}

impl CommandInvocation {
    /// Binds arguments into a spec's template.
    ///
    /// Quoting happens here; see [`CommandSpec::render`]. No side effects:
    /// nothing touches the filesystem until dispatch.
    pub fn bind(spec: &'static CommandSpec, args: &[&str]) -> Result<Self> {
        let command_text = spec.render(args)?;
        Ok(Self {
            spec,
            args: args.iter().map(|a| (*a).to_string()).collect(),
            command_text,
            sentinel: None,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
            state: InvocationState::Created,
        })
    }

    /// The spec this invocation was bound from.
    pub fn spec(&self) -> &'static CommandSpec {
        self.spec
    }

    /// The bound arguments, unquoted.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The fully rendered command line.
    pub fn command_text(&self) -> &str {
        &self.command_text
    }

    /// The sentinel assigned at dispatch, if any.
    pub fn sentinel(&self) -> Option<&str> {
        self.sentinel.as_deref()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// Captured stdout. Final once the state is terminal.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Captured stderr. Final once the state is terminal.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Exit code observed for the command, if the round trip completed.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Returns true if the round trip completed and the command exited 0.
    pub fn succeeded(&self) -> bool {
        self.state == InvocationState::Completed && self.exit_code == Some(0)
    }

    /// Marks the invocation as in flight under the given sentinel.
    ///
    /// Rejects anything but a freshly bound invocation: an invocation is
    /// never reused across two execute calls.
    pub fn begin_dispatch(&mut self, sentinel: String) -> Result<()> {
        if self.state != InvocationState::Created {
            return Err(ExecError::InvalidCommandDefinition {
                id: self.spec.id.to_string(),
                reason: format!("invocation in state {:?} cannot be dispatched", self.state),
            });
        }
        self.sentinel = Some(sentinel);
        self.state = InvocationState::Dispatched;
        Ok(())
    }

    /// Records the final exit code and output. Console-side only.
    pub fn complete(&mut self, exit_code: i32, stdout: String, stderr: String) -> Result<()> {
        self.require_in_flight("complete")?;
        self.exit_code = Some(exit_code);
        self.stdout = stdout;
        self.stderr = stderr;
        self.state = InvocationState::Completed;
        Ok(())
    }

    /// Records a cancellation, keeping whatever output was captured.
    ///
    /// With output the invocation lands in
    /// [`InvocationState::PartiallyCompleted`] so partial effects are a
    /// first-class outcome; without output it is plain `Cancelled`.
    pub fn cancel(&mut self, stdout: String, stderr: String) -> Result<()> {
        self.require_in_flight("cancel")?;
        self.state = if stdout.is_empty() && stderr.is_empty() {
            InvocationState::Cancelled
        } else {
            InvocationState::PartiallyCompleted
        };
        self.stdout = stdout;
        self.stderr = stderr;
        Ok(())
    }

    /// Snapshot of the captured buffers for partial-completion reporting.
    pub fn partial_output(&self) -> PartialOutput {
        PartialOutput {
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
        }
    }

    fn require_in_flight(&self, op: &str) -> Result<()> {
        if self.state != InvocationState::Dispatched {
            return Err(ExecError::InvalidCommandDefinition {
                id: self.spec.id.to_string(),
                reason: format!("cannot {op} an invocation in state {:?}", self.state),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "invocation.test.rs"]
mod tests;
