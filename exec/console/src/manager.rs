//! The process-wide console registry.

use explorer_command::classify::ErrorClassifier;
use explorer_command::classify::StderrPatternClassifier;
use explorer_command::invocation::CommandInvocation;
use explorer_command::spec::CommandSpec;
use explorer_error::Result;
use tokio::sync::Mutex;
use tokio::sync::MutexGuard;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::ConsoleConfig;
use crate::console::CancelOutcome;
use crate::console::Console;
use crate::console::PrivilegeLevel;

/// Creates, health-checks, and recreates the two process-wide consoles.
///
/// Exactly one Normal and one Elevated console exist per manager; opening
/// privileged shells is expensive and each elevation may require a fresh
/// trust prompt. The registry is explicitly lifetimed (construct it at
/// startup, call [`ConsoleManager::shutdown`] at teardown) so tests can
/// inject isolated instances instead of sharing a global.
#[derive(Debug)]
pub struct ConsoleManager {
    config: ConsoleConfig,
    normal: Mutex<Option<Console>>,
    elevated: Mutex<Option<Console>>,
}

/// Exclusive access to one console for one round trip.
///
/// Holding the guard is what keeps a second invocation from being
/// dispatched to the same console; it is released on drop.
pub struct ConsoleGuard<'a> {
    slot: MutexGuard<'a, Option<Console>>,
}

impl ConsoleGuard<'_> {
    /// The console this guard locks. Alive at acquisition time.
    pub fn console(&mut self) -> &mut Console {
        match self.slot.as_mut() {
            Some(console) => console,
            // The slot is filled before a guard is handed out.
            None => unreachable!("acquired console slot is empty"),
        }
    }
}

impl ConsoleManager {
    /// Creates a registry with the given configuration. No console is
    /// opened until first acquired.
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            normal: Mutex::new(None),
            elevated: Mutex::new(None),
        }
    }

    /// Creates a registry configured from defaults plus environment
    /// overrides.
    pub fn from_env() -> Self {
        Self::new(ConsoleConfig::from_env())
    }

    /// Returns exclusive access to a healthy console for the requested
    /// privilege level, opening or recreating it first if needed.
    ///
    /// Callers for the same level queue on the level's lock; a busy
    /// console is never handed out. An elevated console that cannot be
    /// opened surfaces as [`explorer_error::ExecError::ConsoleAlloc`],
    /// the caller-facing "elevated access unavailable" condition.
    pub async fn acquire(&self, requires_elevation: bool) -> Result<ConsoleGuard<'_>> {
        let (slot, level) = if requires_elevation {
            (&self.elevated, PrivilegeLevel::Elevated)
        } else {
            (&self.normal, PrivilegeLevel::Normal)
        };

        let mut guard = slot.lock().await;
        let healthy = guard.as_mut().is_some_and(|console| console.is_alive());
        if !healthy {
            if let Some(mut stale) = guard.take() {
                tracing::warn!(?level, "replacing dead console");
                stale.close().await;
            }
            *guard = Some(Console::open(level, &self.config).await?);
        }
        Ok(ConsoleGuard { slot: guard })
    }

    /// Runs one invocation on the console its spec requires.
    pub async fn execute(&self, invocation: &mut CommandInvocation) -> Result<()> {
        let mut guard = self.acquire(invocation.spec().requires_elevation).await?;
        guard.console().execute(invocation).await
    }

    /// Streaming variant of [`ConsoleManager::execute`]; complete stdout
    /// lines are forwarded through `lines` as they arrive.
    pub async fn execute_streaming(
        &self,
        invocation: &mut CommandInvocation,
        lines: &mpsc::Sender<String>,
    ) -> Result<()> {
        let mut guard = self.acquire(invocation.spec().requires_elevation).await?;
        guard.console().execute_streaming(invocation, lines).await
    }

    /// Cancellable variant of [`ConsoleManager::execute`]. A console
    /// killed by cancellation is replaced on the next acquire.
    pub async fn execute_with_cancel(
        &self,
        invocation: &mut CommandInvocation,
        cancel: &CancellationToken,
    ) -> Result<CancelOutcome> {
        let mut guard = self.acquire(invocation.spec().requires_elevation).await?;
        guard.console().execute_with_cancel(invocation, cancel).await
    }

    /// Convenience pipeline: bind, execute, classify. Returns the raw
    /// stdout of a successful command.
    pub async fn run(&self, spec: &'static CommandSpec, args: &[&str]) -> Result<String> {
        let mut invocation = CommandInvocation::bind(spec, args)?;
        self.execute(&mut invocation).await?;
        StderrPatternClassifier
            .classify(&invocation)
            .map(str::to_string)
    }

    /// Closes both consoles. The manager can be used again afterwards;
    /// consoles reopen lazily.
    pub async fn shutdown(&self) {
        for slot in [&self.normal, &self.elevated] {
            let mut guard = slot.lock().await;
            if let Some(mut console) = guard.take() {
                console.close().await;
            }
        }
    }
}

#[cfg(test)]
#[path = "manager.test.rs"]
mod tests;
