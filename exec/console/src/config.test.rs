#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_defaults() {
    let config = ConsoleConfig::default();
    assert_eq!(config.shell_program, "sh");
    assert_eq!(config.elevation_program, "su");
    assert_eq!(config.command_timeout_secs, 120);
    assert_eq!(config.probe_timeout_secs, 10);
    assert_eq!(config.cancel_grace_ms, 500);
}

#[test]
fn test_env_overrides_shell_binaries() {
    // SAFETY: no other test in this binary reads or writes these vars.
    unsafe {
        std::env::set_var(SHELL_ENV, "dash");
        std::env::set_var(ELEVATION_ENV, "");
    }
    let config = ConsoleConfig::from_env();
    unsafe {
        std::env::remove_var(SHELL_ENV);
        std::env::remove_var(ELEVATION_ENV);
    }

    assert_eq!(config.shell_program, "dash");
    // An empty override is ignored, not taken literally.
    assert_eq!(config.elevation_program, "su");
}

#[test]
fn test_deserialize_partial_document() {
    let config: ConsoleConfig =
        serde_json::from_str(r#"{"command_timeout_secs": 30}"#).expect("deserialize");
    assert_eq!(config.command_timeout_secs, 30);
    assert_eq!(config.shell_program, "sh");
}
