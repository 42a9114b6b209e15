//! One persistent shell process and the sentinel framing protocol.

use std::process::Stdio;
use std::time::Duration;
use std::time::Instant;

use explorer_command::CommandInvocation;
use explorer_error::ExecError;
use explorer_error::Result;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::process::Child;
use tokio::process::ChildStderr;
use tokio::process::ChildStdin;
use tokio::process::ChildStdout;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::ConsoleConfig;
use crate::sentinel::next_sentinel;

/// Which shell variant a console runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrivilegeLevel {
    /// The ordinary unprivileged shell.
    Normal,
    /// A shell behind the elevation wrapper, with expanded filesystem
    /// permissions.
    Elevated,
}

impl PrivilegeLevel {
    fn program<'a>(self, config: &'a ConsoleConfig) -> &'a str {
        match self {
            Self::Normal => &config.shell_program,
            Self::Elevated => &config.elevation_program,
        }
    }
}

/// How a cancellable execute ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The command finished (possibly within the cancellation grace
    /// period); the invocation is `Completed`.
    Completed,
    /// The command had to be killed. The invocation holds whatever output
    /// was captured, and this console is dead.
    Cancelled,
}

/// Failure of one round trip, below the typed-error boundary.
#[derive(Debug, Error)]
enum RunError {
    #[error("console stream error: {0}")]
    Io(#[from] std::io::Error),
    #[error("console process closed its streams mid-command")]
    UnexpectedEof,
    #[error("unparseable exit status after sentinel")]
    BadFrame,
}

enum Flow {
    Done(std::result::Result<(String, i32, String), RunError>),
    Cancelled,
    TimedOut,
}

/// A handle to one long-lived interactive shell process.
///
/// At most one invocation is in flight at a time; `execute` takes
/// `&mut self`, and [`crate::ConsoleManager`] serializes callers per
/// privilege level. A console that times out, loses its process, gets its
/// invocation killed, or has its execute future dropped mid-command must
/// be replaced; its stream state can no longer be trusted to frame a
/// sentinel.
#[derive(Debug)]
pub struct Console {
    level: PrivilegeLevel,
    child: Child,
    stdin: ChildStdin,
    stdout: ChildStdout,
    stderr: ChildStderr,
    command_timeout: Duration,
    cancel_grace: Duration,
    busy: bool,
    dead: bool,
}

impl Console {
    /// Starts the shell process for the given privilege level and verifies
    /// it with a probe round trip.
    ///
    /// Fails with [`ExecError::ConsoleAlloc`] if the binary is missing, the
    /// spawn fails, or the probe does not come back. For the elevated
    /// level that includes a refused trust grant.
    pub async fn open(level: PrivilegeLevel, config: &ConsoleConfig) -> Result<Self> {
        let program = level.program(config);
        let resolved = which::which(program).map_err(|err| ExecError::ConsoleAlloc {
            reason: format!("{program}: {err}"),
        })?;

        let mut child = Command::new(&resolved)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| ExecError::ConsoleAlloc {
                reason: format!("failed to spawn {program}: {err}"),
            })?;

        let stdin = take_handle(child.stdin.take(), "stdin")?;
        let stdout = take_handle(child.stdout.take(), "stdout")?;
        let stderr = take_handle(child.stderr.take(), "stderr")?;

        let mut console = Self {
            level,
            child,
            stdin,
            stdout,
            stderr,
            command_timeout: Duration::from_secs(config.command_timeout_secs),
            cancel_grace: Duration::from_millis(config.cancel_grace_ms),
            busy: false,
            dead: false,
        };

        if let Err(reason) = console
            .probe(Duration::from_secs(config.probe_timeout_secs))
            .await
        {
            console.teardown().await;
            return Err(ExecError::ConsoleAlloc { reason });
        }

        tracing::debug!(?level, program, "console opened");
        Ok(console)
    }

    /// The privilege level this console was opened at.
    pub fn level(&self) -> PrivilegeLevel {
        self.level
    }

    /// True while an invocation is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Health probe: the process is running and the framing state is
    /// intact.
    ///
    /// A console still flagged busy here was abandoned mid-command (its
    /// execute future was dropped); the unread frame makes its streams
    /// unusable, so it reports dead and gets replaced.
    pub fn is_alive(&mut self) -> bool {
        !self.dead && !self.busy && matches!(self.child.try_wait(), Ok(None))
    }

    /// Terminates the process and releases handles. Idempotent.
    pub async fn close(&mut self) {
        if !self.dead {
            tracing::debug!(level = ?self.level, "closing console");
        }
        self.teardown().await;
    }

    /// Runs one invocation to completion.
    ///
    /// The command text is written to the shell followed by a trailer that
    /// echoes the invocation's sentinel and exit code. Both streams are
    /// read concurrently up to their sentinel; the results land in the
    /// invocation. Success here means the round trip completed;
    /// classification of the exit code is a separate step.
    pub async fn execute(&mut self, invocation: &mut CommandInvocation) -> Result<()> {
        self.dispatch(invocation, None, None).await.map(|_| ())
    }

    /// Like [`Console::execute`], additionally forwarding each complete
    /// stdout line through `lines` as it arrives, for bulk operations
    /// whose output should be delivered incrementally.
    pub async fn execute_streaming(
        &mut self,
        invocation: &mut CommandInvocation,
        lines: &mpsc::Sender<String>,
    ) -> Result<()> {
        self.dispatch(invocation, Some(lines), None).await.map(|_| ())
    }

    /// Like [`Console::execute`], honoring `cancel` cooperatively: once
    /// the token fires, the command gets a grace period to finish on its
    /// own; if it does not, the process is killed, the console marks
    /// itself dead, and the invocation records its partial output.
    pub async fn execute_with_cancel(
        &mut self,
        invocation: &mut CommandInvocation,
        cancel: &CancellationToken,
    ) -> Result<CancelOutcome> {
        self.dispatch(invocation, None, Some(cancel)).await
    }

    async fn dispatch(
        &mut self,
        invocation: &mut CommandInvocation,
        sink: Option<&mpsc::Sender<String>>,
        cancel: Option<&CancellationToken>,
    ) -> Result<CancelOutcome> {
        let id = invocation.spec().id;
        if self.busy {
            // A previous execute future was dropped mid-command; the
            // abandoned frame is still in the pipes.
            tracing::warn!(id, "console abandoned mid-command, tearing down");
            self.teardown().await;
            return Err(ExecError::no_exit_status(id));
        }
        if self.dead || !self.is_alive() {
            self.dead = true;
            return Err(ExecError::no_exit_status(id));
        }
        if invocation.spec().requires_elevation && self.level != PrivilegeLevel::Elevated {
            return Err(ExecError::InvalidCommandDefinition {
                id: id.to_string(),
                reason: "command requires the elevated console".to_string(),
            });
        }

        let sentinel = next_sentinel();
        invocation.begin_dispatch(sentinel.clone())?;
        tracing::debug!(id, level = ?self.level, "dispatching invocation");

        let command_timeout = self.command_timeout;
        let cancel_grace = self.cancel_grace;
        let start = Instant::now();
        let mut out_acc: Vec<u8> = Vec::new();
        let mut err_acc: Vec<u8> = Vec::new();

        self.busy = true;
        let flow = {
            let Self {
                stdin,
                stdout,
                stderr,
                ..
            } = self;
            let fut = round_trip(
                stdin,
                stdout,
                stderr,
                invocation.command_text(),
                &sentinel,
                &mut out_acc,
                &mut err_acc,
                sink,
            );
            tokio::pin!(fut);
            let cancelled = async {
                match cancel {
                    Some(token) => token.cancelled().await,
                    None => std::future::pending::<()>().await,
                }
            };
            tokio::select! {
                res = &mut fut => Flow::Done(res),
                _ = cancelled => match tokio::time::timeout(cancel_grace, &mut fut).await {
                    Ok(res) => Flow::Done(res),
                    Err(_) => Flow::Cancelled,
                },
                _ = tokio::time::sleep(command_timeout) => Flow::TimedOut,
            }
        };
        self.busy = false;
        let duration_ms = start.elapsed().as_millis() as i64;

        match flow {
            Flow::Done(Ok((stdout, exit_code, stderr))) => {
                tracing::debug!(id, exit_code, duration_ms, "invocation completed");
                invocation.complete(exit_code, stdout, stderr)?;
                Ok(CancelOutcome::Completed)
            }
            Flow::Done(Err(failure)) => {
                tracing::warn!(id, error = %failure, "console failed mid-command");
                self.teardown().await;
                invocation.complete(
                    -1,
                    String::from_utf8_lossy(&out_acc).into_owned(),
                    String::from_utf8_lossy(&err_acc).into_owned(),
                )?;
                Err(ExecError::no_exit_status(id))
            }
            Flow::Cancelled => {
                tracing::debug!(id, duration_ms, "invocation cancelled, killing console");
                self.teardown().await;
                invocation.cancel(
                    String::from_utf8_lossy(&out_acc).into_owned(),
                    String::from_utf8_lossy(&err_acc).into_owned(),
                )?;
                Ok(CancelOutcome::Cancelled)
            }
            Flow::TimedOut => {
                tracing::warn!(id, ?command_timeout, "invocation timed out, tearing console down");
                self.teardown().await;
                invocation.complete(
                    -1,
                    String::from_utf8_lossy(&out_acc).into_owned(),
                    String::from_utf8_lossy(&err_acc).into_owned(),
                )?;
                Err(ExecError::no_exit_status(id))
            }
        }
    }

    /// Open-time verification round trip.
    async fn probe(&mut self, timeout: Duration) -> std::result::Result<(), String> {
        let sentinel = next_sentinel();
        let mut out_acc: Vec<u8> = Vec::new();
        let mut err_acc: Vec<u8> = Vec::new();
        let Self {
            stdin,
            stdout,
            stderr,
            ..
        } = self;
        let fut = round_trip(
            stdin,
            stdout,
            stderr,
            "true",
            &sentinel,
            &mut out_acc,
            &mut err_acc,
            None,
        );
        match tokio::time::timeout(timeout, fut).await {
            Ok(Ok((_, 0, _))) => Ok(()),
            Ok(Ok((_, code, _))) => Err(format!("console probe exited with {code}")),
            Ok(Err(failure)) => Err(format!("console probe failed: {failure}")),
            Err(_) => Err("console probe timed out".to_string()),
        }
    }

    async fn teardown(&mut self) {
        self.dead = true;
        let _ = self.child.start_kill();
        let _ = self.child.wait().await;
    }
}

fn take_handle<T>(handle: Option<T>, name: &str) -> Result<T> {
    handle.ok_or_else(|| ExecError::ConsoleAlloc {
        reason: format!("{name} pipe unavailable"),
    })
}

/// Writes one command plus its sentinel trailer and reads both frames.
///
/// The trailer makes the shell echo the sentinel and the command's exit
/// code on stdout, and the sentinel alone on stderr, after the command
/// finishes. The accumulators are caller-owned so partial output survives
/// this future being dropped on cancellation or timeout.
#[allow(clippy::too_many_arguments)]
async fn round_trip(
    stdin: &mut ChildStdin,
    stdout: &mut ChildStdout,
    stderr: &mut ChildStderr,
    command_text: &str,
    sentinel: &str,
    out_acc: &mut Vec<u8>,
    err_acc: &mut Vec<u8>,
    sink: Option<&mpsc::Sender<String>>,
) -> std::result::Result<(String, i32, String), RunError> {
    let block = format!(
        "{command_text}\n__explorer_rc=$?\necho \"{sentinel}\"\necho \"${{__explorer_rc}}\"\necho \"{sentinel}\" 1>&2\n"
    );
    stdin.write_all(block.as_bytes()).await?;
    stdin.flush().await?;

    let (out_frame, err_frame) = tokio::join!(
        read_stdout_frame(stdout, sentinel, out_acc, sink),
        read_stderr_frame(stderr, sentinel, err_acc),
    );
    let (payload, exit_code) = out_frame?;
    let err_payload = err_frame?;
    Ok((payload, exit_code, err_payload))
}

/// Reads stdout until the sentinel, then parses the exit code from the
/// line immediately following it. Everything before the sentinel is the
/// invocation's payload, even a final unterminated line the sentinel echo
/// got glued onto.
async fn read_stdout_frame(
    reader: &mut ChildStdout,
    sentinel: &str,
    acc: &mut Vec<u8>,
    mut sink: Option<&mpsc::Sender<String>>,
) -> std::result::Result<(String, i32), RunError> {
    let needle = sentinel.as_bytes();
    let mut chunk = [0u8; 4096];
    let mut streamed = 0usize;

    loop {
        if let Some(idx) = find_subslice(acc, needle) {
            if let Some(tx) = sink.take() {
                let _ = stream_lines(tx, acc, &mut streamed, idx).await;
            }
            match parse_exit_line(&acc[idx + needle.len()..]) {
                Some(Ok(exit_code)) => {
                    let payload = String::from_utf8_lossy(&acc[..idx]).into_owned();
                    return Ok((payload, exit_code));
                }
                Some(Err(failure)) => return Err(failure),
                None => {} // exit code line not fully buffered yet
            }
        } else if let Some(tx) = sink {
            // Hold back a tail the length of the sentinel so a boundary
            // split across reads is never forwarded as payload.
            let safe = acc.len().saturating_sub(needle.len()).max(streamed);
            if stream_lines(tx, acc, &mut streamed, safe).await.is_err() {
                sink = None;
            }
        }

        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Err(RunError::UnexpectedEof);
        }
        acc.extend_from_slice(&chunk[..n]);
    }
}

/// Reads stderr until the sentinel (and its terminating newline, so no
/// stray byte leaks into the next frame).
async fn read_stderr_frame(
    reader: &mut ChildStderr,
    sentinel: &str,
    acc: &mut Vec<u8>,
) -> std::result::Result<String, RunError> {
    let needle = sentinel.as_bytes();
    let mut chunk = [0u8; 4096];

    loop {
        if let Some(idx) = find_subslice(acc, needle) {
            let after = idx + needle.len();
            if acc.len() > after {
                if acc[after] != b'\n' {
                    return Err(RunError::BadFrame);
                }
                return Ok(String::from_utf8_lossy(&acc[..idx]).into_owned());
            }
        }

        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Err(RunError::UnexpectedEof);
        }
        acc.extend_from_slice(&chunk[..n]);
    }
}

/// Forwards complete lines in `acc[*streamed..limit]`, advancing the
/// cursor. Errs only if the receiver hung up.
async fn stream_lines(
    tx: &mpsc::Sender<String>,
    acc: &[u8],
    streamed: &mut usize,
    limit: usize,
) -> std::result::Result<(), ()> {
    let limit = limit.max(*streamed);
    while let Some(rel) = acc[*streamed..limit].iter().position(|b| *b == b'\n') {
        let end = *streamed + rel;
        let line = String::from_utf8_lossy(&acc[*streamed..end]).into_owned();
        *streamed = end + 1;
        if tx.send(line).await.is_err() {
            return Err(());
        }
    }
    Ok(())
}

/// Parses the exit code line that follows the sentinel echo.
///
/// Returns `None` while the line is not fully buffered yet.
fn parse_exit_line(after: &[u8]) -> Option<std::result::Result<i32, RunError>> {
    let first = *after.first()?;
    if first != b'\n' {
        return Some(Err(RunError::BadFrame));
    }
    let rest = &after[1..];
    let end = rest.iter().position(|b| *b == b'\n')?;
    match std::str::from_utf8(&rest[..end])
        .ok()
        .and_then(|line| line.trim().parse::<i32>().ok())
    {
        Some(code) => Some(Ok(code)),
        None => Some(Err(RunError::BadFrame)),
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
#[path = "console.test.rs"]
mod tests;
