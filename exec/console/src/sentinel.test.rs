#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;

use super::*;

#[test]
fn test_sentinel_carries_prefix() {
    let sentinel = next_sentinel();
    assert!(sentinel.starts_with(SENTINEL_PREFIX));
}

#[test]
fn test_sentinels_never_repeat() {
    let mut seen = HashSet::new();
    for _ in 0..1000 {
        assert!(seen.insert(next_sentinel()));
    }
}

#[test]
fn test_sentinel_is_shell_safe() {
    // The sentinel is interpolated into a double-quoted echo; it must not
    // need any quoting of its own.
    let sentinel = next_sentinel();
    assert!(
        sentinel
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    );
}
