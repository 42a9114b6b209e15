use super::*;

#[test]
fn test_display_command_not_found() {
    let err = ExecError::CommandNotFound {
        id: "mkdir".to_string(),
    };
    assert_eq!(err.to_string(), "command not found: mkdir");
}

#[test]
fn test_display_read_only_filesystem() {
    let err = ExecError::ReadOnlyFilesystem {
        mount_point: PathBuf::from("/system"),
    };
    assert_eq!(err.to_string(), "read-only file system: /system");
}

#[test]
fn test_no_exit_status_uses_sentinel_code() {
    match ExecError::no_exit_status("ls") {
        ExecError::ExecutionFailed { id, exit_code } => {
            assert_eq!(id, "ls");
            assert_eq!(exit_code, -1);
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn test_parse_error_converts_into_exec_error() {
    let parse = ParseError::EmptyOutput;
    let err: ExecError = parse.into();
    assert!(matches!(err, ExecError::Parse(ParseError::EmptyOutput)));
}

#[test]
fn test_partial_output_is_empty() {
    assert!(PartialOutput::default().is_empty());
    let partial = PartialOutput {
        stdout: "3 entries removed\n".to_string(),
        stderr: String::new(),
    };
    assert!(!partial.is_empty());
}
