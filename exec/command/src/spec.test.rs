#![allow(clippy::unwrap_used, clippy::expect_used)]

use explorer_error::ExecError;
use pretty_assertions::assert_eq;

use super::*;

static TWO_ARGS: CommandSpec = CommandSpec {
    id: "two",
    template: "mv {0} {1}",
    requires_elevation: false,
    structured_output: false,
    writable_arg: Some(1),
};

static NO_ARGS: CommandSpec = CommandSpec {
    id: "none",
    template: "pwd",
    requires_elevation: false,
    structured_output: false,
    writable_arg: None,
};

#[test]
fn test_placeholder_count() {
    assert_eq!(TWO_ARGS.placeholder_count(), 2);
    assert_eq!(NO_ARGS.placeholder_count(), 0);
}

#[test]
fn test_render_plain_arguments() {
    let text = TWO_ARGS.render(&["/tmp/a", "/tmp/b"]).unwrap();
    assert_eq!(text, "mv /tmp/a /tmp/b");
}

#[test]
fn test_render_quotes_metacharacters() {
    let hostile = "/tmp/x; rm -rf /";
    let text = TWO_ARGS.render(&[hostile, "/tmp/b"]).unwrap();
    // The rendered line must tokenize back to exactly three words, with
    // the hostile path intact as a single argument.
    let tokens = shlex::split(&text).expect("rendered text tokenizes");
    assert_eq!(tokens, vec!["mv", hostile, "/tmp/b"]);
}

#[test]
fn test_render_quotes_substitution_attempts() {
    let hostile = "$(reboot)";
    let text = TWO_ARGS.render(&[hostile, "`id`"]).unwrap();
    let tokens = shlex::split(&text).expect("rendered text tokenizes");
    assert_eq!(tokens, vec!["mv", hostile, "`id`"]);
}

#[test]
fn test_render_argument_containing_placeholder_text() {
    // A bound value that looks like a placeholder must not be re-expanded.
    let text = TWO_ARGS.render(&["{1}", "/tmp/b"]).unwrap();
    let tokens = shlex::split(&text).expect("rendered text tokenizes");
    assert_eq!(tokens, vec!["mv", "{1}", "/tmp/b"]);
}

#[test]
fn test_render_too_few_arguments() {
    let err = TWO_ARGS.render(&["/tmp/a"]).unwrap_err();
    assert!(matches!(
        err,
        ExecError::InvalidCommandDefinition { ref id, .. } if id == "two"
    ));
}

#[test]
fn test_render_too_many_arguments() {
    let err = NO_ARGS.render(&["/tmp/a"]).unwrap_err();
    assert!(matches!(err, ExecError::InvalidCommandDefinition { .. }));
}

#[test]
fn test_render_rejects_nul_byte() {
    let err = TWO_ARGS.render(&["a\0b", "/tmp/b"]).unwrap_err();
    assert!(matches!(err, ExecError::InvalidCommandDefinition { .. }));
}
