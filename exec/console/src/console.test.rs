#![allow(clippy::unwrap_used, clippy::expect_used)]

use explorer_command::CommandSpec;
use explorer_command::InvocationState;
use explorer_command::classify::ErrorClassifier;
use explorer_command::classify::StderrPatternClassifier;
use explorer_command::registry;
use pretty_assertions::assert_eq;

use super::*;

static ECHO: CommandSpec = CommandSpec {
    id: "echo",
    template: "echo {0}",
    requires_elevation: false,
    structured_output: false,
    writable_arg: None,
};

static ECHO_ERR: CommandSpec = CommandSpec {
    id: "echoerr",
    template: "echo {0} >&2",
    requires_elevation: false,
    structured_output: false,
    writable_arg: None,
};

static SLEEP: CommandSpec = CommandSpec {
    id: "sleep",
    template: "sleep {0}",
    requires_elevation: false,
    structured_output: false,
    writable_arg: None,
};

static SLOW_ECHO: CommandSpec = CommandSpec {
    id: "slowecho",
    template: "sleep 1 && echo {0}",
    requires_elevation: false,
    structured_output: false,
    writable_arg: None,
};

static MULTILINE: CommandSpec = CommandSpec {
    id: "multiline",
    template: "printf 'a\\nb\\nc\\n'",
    requires_elevation: false,
    structured_output: true,
    writable_arg: None,
};

async fn open_normal() -> Console {
    Console::open(PrivilegeLevel::Normal, &ConsoleConfig::default())
        .await
        .expect("open normal console")
}

fn bind(spec: &'static CommandSpec, args: &[&str]) -> CommandInvocation {
    CommandInvocation::bind(spec, args).expect("bind")
}

#[tokio::test]
async fn test_execute_round_trip() {
    let mut console = open_normal().await;
    let mut invocation = bind(&ECHO, &["hello"]);

    console.execute(&mut invocation).await.expect("execute");

    assert_eq!(invocation.state(), InvocationState::Completed);
    assert_eq!(invocation.exit_code(), Some(0));
    assert_eq!(invocation.stdout(), "hello\n");
    assert_eq!(invocation.stderr(), "");
    assert!(console.is_alive());
    assert!(!console.is_busy());
    console.close().await;
}

#[tokio::test]
async fn test_back_to_back_invocations_do_not_cross_talk() {
    let mut console = open_normal().await;

    let mut first = bind(&ECHO, &["alpha"]);
    console.execute(&mut first).await.expect("first");
    let mut second = bind(&ECHO, &["beta"]);
    console.execute(&mut second).await.expect("second");

    assert_eq!(first.stdout(), "alpha\n");
    assert_eq!(second.stdout(), "beta\n");
    let first_sentinel = first.sentinel().expect("sentinel");
    let second_sentinel = second.sentinel().expect("sentinel");
    assert_ne!(first_sentinel, second_sentinel);
    assert!(!first.stdout().contains(second_sentinel));
    assert!(!first.stdout().contains("beta"));
    assert!(!second.stdout().contains(first_sentinel));
    assert!(!second.stdout().contains("alpha"));
    console.close().await;
}

#[tokio::test]
async fn test_stderr_is_captured_separately() {
    let mut console = open_normal().await;
    let mut invocation = bind(&ECHO_ERR, &["oops"]);

    console.execute(&mut invocation).await.expect("execute");

    assert_eq!(invocation.exit_code(), Some(0));
    assert_eq!(invocation.stdout(), "");
    assert_eq!(invocation.stderr(), "oops\n");
    console.close().await;
}

#[tokio::test]
async fn test_missing_path_classifies_as_no_such_file() {
    let mut console = open_normal().await;
    let mut invocation = bind(&registry::LIST_DIR, &["/definitely/not/a/real/path"]);

    console.execute(&mut invocation).await.expect("round trip");

    assert_ne!(invocation.exit_code(), Some(0));
    let err = StderrPatternClassifier.classify(&invocation).unwrap_err();
    assert!(matches!(
        err,
        explorer_error::ExecError::NoSuchFileOrDirectory
    ));
    // The round trip itself is fine; the console stays usable.
    assert!(console.is_alive());
    console.close().await;
}

#[tokio::test]
async fn test_timeout_tears_console_down() {
    let config = ConsoleConfig {
        command_timeout_secs: 1,
        ..ConsoleConfig::default()
    };
    let mut console = Console::open(PrivilegeLevel::Normal, &config)
        .await
        .expect("open");
    let mut invocation = bind(&SLEEP, &["5"]);

    let err = console.execute(&mut invocation).await.unwrap_err();
    assert!(matches!(
        err,
        explorer_error::ExecError::ExecutionFailed { exit_code: -1, .. }
    ));
    assert_eq!(invocation.exit_code(), Some(-1));
    assert!(!console.is_alive());
    console.close().await;
}

#[tokio::test]
async fn test_killed_process_fails_instead_of_hanging() {
    let mut console = open_normal().await;
    console.child.start_kill().expect("kill underlying process");
    let _ = console.child.wait().await;

    let mut invocation = bind(&ECHO, &["never"]);
    let err = console.execute(&mut invocation).await.unwrap_err();
    assert!(matches!(
        err,
        explorer_error::ExecError::ExecutionFailed { exit_code: -1, .. }
    ));
    assert!(!console.is_alive());
    console.close().await;
}

#[tokio::test]
async fn test_dropped_execute_future_poisons_console() {
    let mut console = open_normal().await;

    // Drop an in-flight execute; its frame stays unread in the pipes.
    let mut abandoned = bind(&SLOW_ECHO, &["stale"]);
    let _ = tokio::time::timeout(
        Duration::from_millis(100),
        console.execute(&mut abandoned),
    )
    .await;

    assert!(console.is_busy());
    assert!(!console.is_alive());

    // The next invocation must fail cleanly rather than read the
    // abandoned command's output, sentinel, and exit-code line.
    let mut next = bind(&ECHO, &["clean"]);
    let err = console.execute(&mut next).await.unwrap_err();
    assert!(matches!(
        err,
        explorer_error::ExecError::ExecutionFailed { exit_code: -1, .. }
    ));
    assert_eq!(next.stdout(), "");
    assert!(!next.stdout().contains("stale"));
    console.close().await;
}

#[tokio::test]
async fn test_streaming_delivers_lines_incrementally() {
    let mut console = open_normal().await;
    let mut invocation = bind(&MULTILINE, &[]);
    let (tx, mut rx) = tokio::sync::mpsc::channel(16);

    console
        .execute_streaming(&mut invocation, &tx)
        .await
        .expect("execute");
    drop(tx);

    let mut lines = Vec::new();
    while let Some(line) = rx.recv().await {
        lines.push(line);
    }
    assert_eq!(lines, vec!["a", "b", "c"]);
    assert_eq!(invocation.stdout(), "a\nb\nc\n");
    console.close().await;
}

#[tokio::test]
async fn test_cancel_kills_after_grace() {
    let mut console = open_normal().await;
    let mut invocation = bind(&SLEEP, &["5"]);
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let outcome = console
        .execute_with_cancel(&mut invocation, &token)
        .await
        .expect("cancellable execute");
    assert_eq!(outcome, CancelOutcome::Cancelled);
    assert_eq!(invocation.state(), InvocationState::Cancelled);
    assert!(!console.is_alive());
    console.close().await;
}

#[tokio::test]
async fn test_cancel_grace_lets_fast_command_finish() {
    let config = ConsoleConfig {
        cancel_grace_ms: 2_000,
        ..ConsoleConfig::default()
    };
    let mut console = Console::open(PrivilegeLevel::Normal, &config)
        .await
        .expect("open");
    let mut invocation = bind(&ECHO, &["quick"]);
    let token = CancellationToken::new();
    token.cancel();

    let outcome = console
        .execute_with_cancel(&mut invocation, &token)
        .await
        .expect("cancellable execute");
    assert_eq!(outcome, CancelOutcome::Completed);
    assert!(invocation.succeeded());
    console.close().await;
}

#[tokio::test]
async fn test_open_fails_for_missing_binary() {
    let config = ConsoleConfig {
        shell_program: "definitely-not-a-shell-7c1f".to_string(),
        ..ConsoleConfig::default()
    };
    let err = Console::open(PrivilegeLevel::Normal, &config)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        explorer_error::ExecError::ConsoleAlloc { .. }
    ));
}

#[tokio::test]
async fn test_open_fails_when_probe_gets_no_answer() {
    // `false` starts, exits immediately, and never answers the probe.
    let config = ConsoleConfig {
        shell_program: "false".to_string(),
        ..ConsoleConfig::default()
    };
    let err = Console::open(PrivilegeLevel::Normal, &config)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        explorer_error::ExecError::ConsoleAlloc { .. }
    ));
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let mut console = open_normal().await;
    console.close().await;
    console.close().await;
    assert!(!console.is_alive());
}

#[test]
fn test_find_subslice() {
    assert_eq!(find_subslice(b"abcdef", b"cd"), Some(2));
    assert_eq!(find_subslice(b"abcdef", b"fg"), None);
    assert_eq!(find_subslice(b"ab", b"abc"), None);
    assert_eq!(find_subslice(b"abc", b""), None);
}

#[test]
fn test_parse_exit_line() {
    assert!(parse_exit_line(b"").is_none());
    assert!(parse_exit_line(b"\n0").is_none()); // newline not buffered yet
    assert!(matches!(parse_exit_line(b"\n0\n"), Some(Ok(0))));
    assert!(matches!(parse_exit_line(b"\n127\n"), Some(Ok(127))));
    assert!(matches!(parse_exit_line(b"x0\n"), Some(Err(_))));
    assert!(matches!(parse_exit_line(b"\nnope\n"), Some(Err(_))));
}
