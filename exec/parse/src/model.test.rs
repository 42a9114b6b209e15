#![allow(clippy::unwrap_used, clippy::expect_used)]

use explorer_error::ParseError;
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_file_type_identifiers_round_trip() {
    for file_type in [
        FileType::Regular,
        FileType::Directory,
        FileType::Symlink,
        FileType::BlockDevice,
        FileType::CharDevice,
        FileType::Fifo,
        FileType::Socket,
    ] {
        assert_eq!(FileType::from_unix_id(file_type.unix_id()), Some(file_type));
    }
    assert_eq!(FileType::from_unix_id('?'), None);
}

#[test]
fn test_symbolic_to_octal() {
    let cases = [
        ("rwxr-xr-x", "0755"),
        ("rw-r--r--", "0644"),
        ("rwx------", "0700"),
        ("---------", "0000"),
        ("rwsr-xr-x", "4755"),
        ("rwSr--r--", "4644"),
        ("rwxr-sr-x", "2755"),
        ("rwxrwxrwt", "1777"),
        ("rwxrwxrwT", "1776"),
    ];
    for (symbolic, octal) in cases {
        let permissions = Permissions::from_symbolic(symbolic).expect(symbolic);
        assert_eq!(permissions.octal(), octal, "octal of {symbolic}");
        assert_eq!(permissions.symbolic(), symbolic, "round trip");
    }
}

#[test]
fn test_octal_parses_back() {
    let permissions = Permissions::from_octal("4755").expect("octal");
    assert_eq!(permissions.symbolic(), "rwsr-xr-x");
    assert_eq!(Permissions::from_octal("755").expect("short").octal(), "0755");
}

#[test]
fn test_rejects_malformed_permission_strings() {
    for bad in ["rwxr-xr-", "rwxr-xr-xx", "rwxr-qr-x", "rwxr-xr-s"] {
        let err = Permissions::from_symbolic(bad).unwrap_err();
        assert!(
            matches!(
                err,
                ParseError::InvalidField {
                    field: "permissions",
                    ..
                }
            ),
            "{bad}"
        );
    }
    assert!(Permissions::from_octal("8").is_err());
    assert!(Permissions::from_octal("").is_err());
    assert!(Permissions::from_octal("77777").is_err());
}

#[test]
fn test_mode_masks_non_permission_bits() {
    assert_eq!(Permissions::from_mode(0o100644).mode(), 0o644);
}

#[test]
fn test_file_entry_serializes() {
    let entry = FileEntry {
        name: "null".to_string(),
        file_type: FileType::CharDevice,
        permissions: Permissions::from_octal("0666").expect("octal"),
        user: "root".to_string(),
        group: "root".to_string(),
        size: 0,
        device: Some((1, 3)),
        modified: None,
        link_target: None,
    };
    let json = serde_json::to_string(&entry).expect("serialize");
    let back: FileEntry = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, entry);
}
