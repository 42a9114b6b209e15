//! Persistent shell consoles and their lifecycle.
//!
//! A [`Console`] owns one long-lived interactive shell process (`sh`, or an
//! elevation wrapper such as `su`) and multiplexes logical commands over its
//! single pair of output streams with a sentinel framing protocol: after
//! each command the shell is made to echo a per-invocation sentinel and the
//! real exit code, and everything read before the sentinel belongs to that
//! invocation. There is no other IPC with the external process.
//!
//! [`ConsoleManager`] is the process-wide registry: at most one console per
//! privilege level, lazily opened, health-checked, and recreated when the
//! underlying process dies. Execution per console is strictly serialized;
//! interleaving two invocations' output would corrupt both frames.

pub mod config;
pub mod console;
pub mod manager;
pub mod sentinel;

pub use config::ConsoleConfig;
pub use console::{CancelOutcome, Console, PrivilegeLevel};
pub use manager::{ConsoleGuard, ConsoleManager};
