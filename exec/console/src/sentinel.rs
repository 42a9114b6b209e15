//! Per-invocation sentinel tokens.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

/// Fixed marker prefix, chosen to be vanishingly unlikely to appear in
/// filesystem content or utility output.
pub const SENTINEL_PREFIX: &str = "__explorer_done_";

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Returns a sentinel no prior or concurrent invocation has used.
///
/// Prefix + process-wide counter + random suffix: the counter alone makes
/// tokens unique for the process lifetime, the entropy keeps a command
/// that happens to print a previous sentinel from forging a frame
/// boundary.
pub fn next_sentinel() -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let entropy: u64 = rand::random();
    format!("{SENTINEL_PREFIX}{seq}_{entropy:016x}")
}

#[cfg(test)]
#[path = "sentinel.test.rs"]
mod tests;
