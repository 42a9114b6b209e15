#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use super::*;

const LISTING: &str = "\
total 64
drwxr-xr-x root     root              2012-11-13 17:09 acct
-rw-r--r-- root     root         1234 2012-11-13 17:09 default.prop
lrwxrwxrwx root     root              2012-11-13 17:09 etc -> /system/etc
crw-rw-rw- root     root       1,   3 2012-11-13 17:09 null
brw------- root     root       179,  0 2012-11-13 17:09 mmcblk0
prw-r--r-- root     root              2012-11-13 17:09 pipe
srw-rw-rw- root     root              2012-11-13 17:09 socket
-rw-r--r-- media    sdcard_rw  987654 2012-11-13 17:09 my song.mp3
";

fn stamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2012, 11, 13)
        .unwrap()
        .and_hms_opt(17, 9, 0)
        .unwrap()
}

#[test]
fn test_parses_every_row_type() {
    let entries = parse_listing(LISTING).expect("listing");
    assert_eq!(entries.len(), 8);

    let dir = &entries[0];
    assert_eq!(dir.name, "acct");
    assert_eq!(dir.file_type, FileType::Directory);
    assert_eq!(dir.permissions.octal(), "0755");
    assert_eq!(dir.size, 0);
    assert_eq!(dir.modified, Some(stamp()));

    let file = &entries[1];
    assert_eq!(file.name, "default.prop");
    assert_eq!(file.file_type, FileType::Regular);
    assert_eq!(file.size, 1234);
    assert_eq!(file.user, "root");

    let link = &entries[2];
    assert_eq!(link.name, "etc");
    assert_eq!(link.file_type, FileType::Symlink);
    assert_eq!(link.link_target.as_deref(), Some("/system/etc"));

    let char_device = &entries[3];
    assert_eq!(char_device.file_type, FileType::CharDevice);
    assert_eq!(char_device.device, Some((1, 3)));

    let block_device = &entries[4];
    assert_eq!(block_device.file_type, FileType::BlockDevice);
    assert_eq!(block_device.device, Some((179, 0)));

    assert_eq!(entries[5].file_type, FileType::Fifo);
    assert_eq!(entries[6].file_type, FileType::Socket);
}

#[test]
fn test_name_keeps_internal_spaces() {
    let entries = parse_listing(LISTING).expect("listing");
    let song = &entries[7];
    assert_eq!(song.name, "my song.mp3");
    assert_eq!(song.user, "media");
    assert_eq!(song.group, "sdcard_rw");
    assert_eq!(song.size, 987654);
}

#[test]
fn test_empty_listing_is_ok() {
    assert_eq!(parse_listing("").expect("empty"), Vec::new());
    assert_eq!(parse_listing("total 0\n").expect("total only"), Vec::new());
}

#[test]
fn test_unknown_type_char_is_invalid_field() {
    let err = parse_row("?rw-r--r-- root root 1 2012-11-13 17:09 x").unwrap_err();
    assert!(matches!(
        err,
        ParseError::InvalidField {
            field: "file type",
            ..
        }
    ));
}

#[test]
fn test_short_row_reports_column_count() {
    let err = parse_row("-rw-r--r-- root root").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedColumnCount { .. }));
}

#[test]
fn test_garbled_size_is_invalid_field() {
    let err = parse_row("-rw-r--r-- root root huge 2012-11-13 17:09 x").unwrap_err();
    assert!(matches!(
        err,
        ParseError::InvalidField { field: "size", .. }
    ));
}

#[test]
fn test_garbled_timestamp_is_invalid_field() {
    let err = parse_row("drwxr-xr-x root root 13-11-2012 17:09 acct").unwrap_err();
    assert!(matches!(
        err,
        ParseError::InvalidField {
            field: "modification time",
            ..
        }
    ));
}

#[test]
fn test_mode_with_trailing_attribute_char() {
    // Some ls builds append an attribute character to the mode string.
    let entry = parse_row("-rw-r--r--. root root 5 2012-11-13 17:09 sepolicy")
        .expect("row");
    assert_eq!(entry.permissions.octal(), "0644");
}
