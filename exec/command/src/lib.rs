//! Command definitions, argument binding, and error classification.
//!
//! This crate holds the passive half of the execution core:
//!
//! - [`CommandSpec`]: an immutable description of one external command,
//!   defined once in the static [`registry`].
//! - [`CommandInvocation`]: a spec with its arguments bound and quoted,
//!   carrying the sentinel, captured output, and a terminal state.
//! - [`ErrorClassifier`]: turns a completed invocation's exit code and
//!   stderr text into the typed error taxonomy.
//!
//! Nothing here spawns a process. Binding arguments has no side effects;
//! dispatch and stream handling live in the console crate.

pub mod classify;
pub mod invocation;
pub mod mount;
pub mod registry;
pub mod spec;

pub use classify::{ErrorClassifier, StderrPatternClassifier};
pub use invocation::{CommandInvocation, InvocationState};
pub use mount::mount_point_of;
pub use spec::CommandSpec;
