#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use explorer_command::registry;
use explorer_error::ExecError;
use pretty_assertions::assert_eq;

use super::*;

static SLOW: CommandSpec = CommandSpec {
    id: "slow",
    template: "sleep 5",
    requires_elevation: false,
    structured_output: false,
    writable_arg: None,
};

fn manager() -> ConsoleManager {
    ConsoleManager::new(ConsoleConfig::default())
}

#[tokio::test]
async fn test_run_pwd() {
    let manager = manager();
    let out = manager.run(&registry::PWD, &[]).await.expect("pwd");
    assert!(out.ends_with('\n'));
    assert!(out.trim_end().starts_with('/'));
    manager.shutdown().await;
}

#[tokio::test]
async fn test_create_and_delete_dir_round_trip() {
    let manager = manager();
    let root = tempfile::tempdir().expect("tempdir");
    let target = root.path().join("newdir");
    let target_str = target.to_str().expect("utf8 path");

    manager
        .run(&registry::CREATE_DIR, &[target_str])
        .await
        .expect("mkdir");
    assert!(target.is_dir());

    manager
        .run(&registry::DELETE_DIR, &[target_str])
        .await
        .expect("rm -r");
    assert!(!target.exists());
    manager.shutdown().await;
}

#[tokio::test]
async fn test_create_and_delete_file_round_trip() {
    let manager = manager();
    let root = tempfile::tempdir().expect("tempdir");
    let target = root.path().join("new file.txt");
    let target_str = target.to_str().expect("utf8 path");

    manager
        .run(&registry::CREATE_FILE, &[target_str])
        .await
        .expect("touch");
    assert!(target.is_file());

    manager
        .run(&registry::DELETE_FILE, &[target_str])
        .await
        .expect("rm");
    assert!(!target.exists());
    manager.shutdown().await;
}

#[tokio::test]
async fn test_create_under_missing_parent_reports_no_such_file() {
    let manager = manager();
    let root = tempfile::tempdir().expect("tempdir");
    let target = root.path().join("missing").join("child");

    let err = manager
        .run(&registry::CREATE_DIR, &[target.to_str().expect("utf8 path")])
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::NoSuchFileOrDirectory));
    manager.shutdown().await;
}

#[tokio::test]
async fn test_dead_console_is_replaced_on_next_acquire() {
    let manager = manager();
    manager.run(&registry::PWD, &[]).await.expect("warm up");

    {
        let mut guard = manager.acquire(false).await.expect("acquire");
        guard.console().close().await;
    }

    // The slot held a closed console; acquire opens a fresh one.
    let out = manager.run(&registry::PWD, &[]).await.expect("pwd");
    assert!(out.ends_with('\n'));
    manager.shutdown().await;
}

#[tokio::test]
async fn test_abandoned_execute_gets_fresh_console() {
    let manager = manager();
    {
        let mut guard = manager.acquire(false).await.expect("acquire");
        let mut invocation = CommandInvocation::bind(&SLOW, &[]).expect("bind");
        let _ = tokio::time::timeout(
            Duration::from_millis(100),
            guard.console().execute(&mut invocation),
        )
        .await;
    }

    // The abandoned console reports unhealthy and is replaced, so the
    // next run sees a clean frame.
    let out = manager.run(&registry::PWD, &[]).await.expect("fresh console");
    assert!(out.trim_end().starts_with('/'));
    manager.shutdown().await;
}

#[tokio::test]
async fn test_execute_on_closed_console_fails() {
    let manager = manager();
    let mut guard = manager.acquire(false).await.expect("acquire");
    guard.console().close().await;

    let mut invocation =
        CommandInvocation::bind(&registry::PWD, &[]).expect("bind");
    let err = guard.console().execute(&mut invocation).await.unwrap_err();
    assert!(matches!(err, ExecError::ExecutionFailed { .. }));
}

#[tokio::test]
async fn test_elevated_console_unavailable() {
    let config = ConsoleConfig {
        elevation_program: "no-such-elevation-binary-4b9d".to_string(),
        ..ConsoleConfig::default()
    };
    let manager = ConsoleManager::new(config);

    let err = manager.run(&registry::REMOUNT_RW, &["/"]).await.unwrap_err();
    assert!(matches!(err, ExecError::ConsoleAlloc { .. }));
}

#[tokio::test]
async fn test_concurrent_runs_queue_on_one_console() {
    let manager = manager();
    let (a, b) = tokio::join!(
        manager.run(&registry::PWD, &[]),
        manager.run(&registry::PWD, &[]),
    );
    assert_eq!(a.expect("first"), b.expect("second"));
    manager.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_then_reuse() {
    let manager = manager();
    manager.run(&registry::PWD, &[]).await.expect("before");
    manager.shutdown().await;
    manager.run(&registry::PWD, &[]).await.expect("after");
    manager.shutdown().await;
}
