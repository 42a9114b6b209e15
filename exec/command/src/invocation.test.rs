#![allow(clippy::unwrap_used, clippy::expect_used)]

use explorer_error::ExecError;
use pretty_assertions::assert_eq;

use super::*;
use crate::registry;

fn bound() -> CommandInvocation {
    CommandInvocation::bind(&registry::CREATE_DIR, &["/tmp/newdir"]).expect("bind")
}

#[test]
fn test_bind_renders_command_text() {
    let invocation = bound();
    assert_eq!(invocation.command_text(), "mkdir /tmp/newdir");
    assert_eq!(invocation.state(), InvocationState::Created);
    assert_eq!(invocation.sentinel(), None);
    assert_eq!(invocation.exit_code(), None);
}

#[test]
fn test_dispatch_then_complete() {
    let mut invocation = bound();
    invocation
        .begin_dispatch("__explorer_done_1".to_string())
        .unwrap();
    assert_eq!(invocation.state(), InvocationState::Dispatched);
    assert_eq!(invocation.sentinel(), Some("__explorer_done_1"));

    invocation
        .complete(0, String::new(), String::new())
        .unwrap();
    assert_eq!(invocation.state(), InvocationState::Completed);
    assert!(invocation.succeeded());
}

#[test]
fn test_invocation_is_not_reusable() {
    let mut invocation = bound();
    invocation.begin_dispatch("s1".to_string()).unwrap();
    invocation
        .complete(0, String::new(), String::new())
        .unwrap();

    let err = invocation.begin_dispatch("s2".to_string()).unwrap_err();
    assert!(matches!(err, ExecError::InvalidCommandDefinition { .. }));
}

#[test]
fn test_complete_requires_dispatch() {
    let mut invocation = bound();
    let err = invocation
        .complete(0, String::new(), String::new())
        .unwrap_err();
    assert!(matches!(err, ExecError::InvalidCommandDefinition { .. }));
}

#[test]
fn test_completed_buffers_are_final() {
    let mut invocation = bound();
    invocation.begin_dispatch("s1".to_string()).unwrap();
    invocation
        .complete(1, "out".to_string(), "err".to_string())
        .unwrap();

    assert!(invocation.complete(0, String::new(), String::new()).is_err());
    assert!(invocation.cancel(String::new(), String::new()).is_err());
    assert_eq!(invocation.stdout(), "out");
    assert_eq!(invocation.stderr(), "err");
    assert_eq!(invocation.exit_code(), Some(1));
    assert!(!invocation.succeeded());
}

#[test]
fn test_cancel_without_output() {
    let mut invocation = bound();
    invocation.begin_dispatch("s1".to_string()).unwrap();
    invocation.cancel(String::new(), String::new()).unwrap();
    assert_eq!(invocation.state(), InvocationState::Cancelled);
}

#[test]
fn test_cancel_with_output_is_partial() {
    let mut invocation = bound();
    invocation.begin_dispatch("s1".to_string()).unwrap();
    invocation
        .cancel("copied 3 of 10\n".to_string(), String::new())
        .unwrap();
    assert_eq!(invocation.state(), InvocationState::PartiallyCompleted);
    assert!(invocation.state().is_terminal());
    assert_eq!(invocation.partial_output().stdout, "copied 3 of 10\n");
}
