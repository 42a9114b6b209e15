#![allow(clippy::unwrap_used, clippy::expect_used)]

use explorer_error::ExecError;
use pretty_assertions::assert_eq;

use super::*;
use crate::invocation::CommandInvocation;
use crate::registry;
use crate::spec::CommandSpec;

fn completed(
    spec: &'static CommandSpec,
    args: &[&str],
    exit_code: i32,
    stdout: &str,
    stderr: &str,
) -> CommandInvocation {
    let mut invocation = CommandInvocation::bind(spec, args).expect("bind");
    invocation
        .begin_dispatch("__explorer_done_test".to_string())
        .expect("dispatch");
    invocation
        .complete(exit_code, stdout.to_string(), stderr.to_string())
        .expect("complete");
    invocation
}

#[test]
fn test_success_passes_stdout_through_untouched() {
    let stdout = "total 8\ndrwxr-xr-x 2 root root 4096 2024-01-01 00:00 .\n";
    let invocation = completed(&registry::LIST_DIR, &["/tmp"], 0, stdout, "");
    let out = StderrPatternClassifier.classify(&invocation).unwrap();
    assert_eq!(out, stdout);
}

#[test]
fn test_exit_127_is_command_not_found_regardless_of_stderr() {
    let invocation = completed(
        &registry::CREATE_DIR,
        &["/tmp/x"],
        127,
        "",
        "No such file or directory",
    );
    let err = StderrPatternClassifier.classify(&invocation).unwrap_err();
    assert!(matches!(
        err,
        ExecError::CommandNotFound { ref id } if id == "createdir"
    ));
}

#[test]
fn test_exit_255_is_execution_failed() {
    let invocation = completed(&registry::PWD, &[], 255, "", "Permission denied");
    let err = StderrPatternClassifier.classify(&invocation).unwrap_err();
    assert!(matches!(
        err,
        ExecError::ExecutionFailed { exit_code: 255, .. }
    ));
}

#[test]
fn test_missing_parent_directory() {
    let invocation = completed(
        &registry::CREATE_DIR,
        &["/sdcard121212/newtestdir"],
        1,
        "",
        "mkdir: cannot create directory '/sdcard121212/newtestdir': No such file or directory",
    );
    let err = StderrPatternClassifier.classify(&invocation).unwrap_err();
    assert!(matches!(err, ExecError::NoSuchFileOrDirectory));
}

#[test]
fn test_usage_message_maps_to_no_such_file() {
    // Historical behavior: a usage message is assumed to come from a
    // missing path, not a bad flag.
    let invocation = completed(
        &registry::LIST_DIR,
        &["/gone"],
        1,
        "",
        "Usage: ls [OPTION]... [FILE]...",
    );
    let err = StderrPatternClassifier.classify(&invocation).unwrap_err();
    assert!(matches!(err, ExecError::NoSuchFileOrDirectory));
}

#[test]
fn test_permission_denied() {
    let invocation = completed(
        &registry::CREATE_FILE,
        &["/proc/nope"],
        1,
        "",
        "touch: /proc/nope: Permission denied",
    );
    let err = StderrPatternClassifier.classify(&invocation).unwrap_err();
    assert!(matches!(
        err,
        ExecError::InsufficientPermissions { partial: None }
    ));
}

#[test]
fn test_operation_not_permitted_is_insufficient_permissions() {
    let invocation = completed(
        &registry::CHMOD,
        &["0644", "/system/app"],
        1,
        "",
        "chmod: /system/app: Operation not permitted",
    );
    let err = StderrPatternClassifier.classify(&invocation).unwrap_err();
    assert!(matches!(err, ExecError::InsufficientPermissions { .. }));
}

#[test]
fn test_permission_denied_keeps_partial_structured_output() {
    let invocation = completed(
        &registry::LIST_DIR,
        &["/protected"],
        1,
        "-rw-r--r-- 1 root root 0 2024-01-01 00:00 visible\n",
        "ls: /protected/secret: Permission denied",
    );
    let err = StderrPatternClassifier.classify(&invocation).unwrap_err();
    match err {
        ExecError::InsufficientPermissions {
            partial: Some(partial),
        } => assert!(partial.stdout.contains("visible")),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_read_only_filesystem_resolves_mount_point() {
    // "/" always resolves, so a write target directly under it must
    // classify as read-only with a concrete mount point.
    let invocation = completed(
        &registry::CREATE_DIR,
        &["/newdir"],
        1,
        "",
        "mkdir: '/newdir': Read-only file system",
    );
    let err = StderrPatternClassifier.classify(&invocation).unwrap_err();
    match err {
        ExecError::ReadOnlyFilesystem { mount_point } => {
            assert!(mount_point.is_absolute());
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_read_only_without_writable_target_is_execution_failed() {
    // `ls` names no write target, so the mount point cannot be attributed.
    let invocation = completed(
        &registry::LIST_DIR,
        &["/system"],
        1,
        "",
        "Read-only file system",
    );
    let err = StderrPatternClassifier.classify(&invocation).unwrap_err();
    assert!(matches!(err, ExecError::ExecutionFailed { exit_code: 1, .. }));
}

#[test]
fn test_unmatched_nonzero_exit_is_execution_failed() {
    let invocation = completed(&registry::MOVE, &["/a", "/b"], 3, "", "something odd");
    let err = StderrPatternClassifier.classify(&invocation).unwrap_err();
    assert!(matches!(
        err,
        ExecError::ExecutionFailed { ref id, exit_code: 3 } if id == "move"
    ));
}

#[test]
fn test_patterns_match_anywhere_in_stderr() {
    // Root-invoked utilities may wrap the message; matching is not
    // line-anchored.
    let invocation = completed(
        &registry::DELETE_FILE,
        &["/x"],
        1,
        "",
        "su: exec failed\nrm: cannot remove '/x': No such file or directory\n",
    );
    let err = StderrPatternClassifier.classify(&invocation).unwrap_err();
    assert!(matches!(err, ExecError::NoSuchFileOrDirectory));
}

#[test]
fn test_success_with_scary_stderr_is_still_success() {
    // Exit 0 wins over any stderr content.
    let invocation = completed(
        &registry::DELETE_FILE,
        &["/x"],
        0,
        "",
        "rm: Permission denied (ignored)",
    );
    assert!(StderrPatternClassifier.classify(&invocation).is_ok());
}
