#![allow(clippy::unwrap_used, clippy::expect_used)]

use explorer_command::registry;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_dispatch_ids_match_the_registry() {
    for id in ["pwd", "ls", "diskusage", "folderusage"] {
        assert!(registry::find(id).is_some(), "{id} is registered");
    }
}

#[test]
fn test_parse_for_pwd() {
    let parsed = parse_for("pwd", "/sdcard/music\n").expect("pwd");
    assert_eq!(
        parsed,
        ParsedOutput::WorkingDirectory("/sdcard/music".to_string())
    );
    assert_eq!(parse_for("pwd", "\n").unwrap_err(), ParseError::EmptyOutput);
}

#[test]
fn test_parse_for_listing() {
    let stdout = "-rw-r--r-- root root 1234 2012-11-13 17:09 default.prop\n";
    let ParsedOutput::Listing(entries) = parse_for("ls", stdout).expect("ls") else {
        panic!("wrong variant");
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "default.prop");
}

#[test]
fn test_parse_for_folder_usage() {
    assert_eq!(
        parse_for("folderusage", "5204\t/sdcard\n").expect("du"),
        ParsedOutput::FolderUsage(5204)
    );
}

#[test]
fn test_unstructured_id_is_rejected() {
    let err = parse_for("createdir", "").unwrap_err();
    assert!(matches!(
        err,
        ParseError::InvalidField {
            field: "command id",
            ..
        }
    ));
}
