#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use super::*;

const DF: &str = "\
Filesystem     1K-blocks    Used Available Use% Mounted on
/dev/root        1548144  788712    680856  54% /
tmpfs             256254       0    256254   0% /dev
/dev/block/mmcblk0p1 12196824 4853104 7343720  40% /mnt/sd card
";

#[test]
fn test_parses_df_table() {
    let rows = parse_disk_usage(DF).expect("df");
    assert_eq!(rows.len(), 3);

    let root = &rows[0];
    assert_eq!(root.filesystem, "/dev/root");
    assert_eq!(root.mount_point, "/");
    assert_eq!(root.total_kb, 1_548_144);
    assert_eq!(root.used_kb, 788_712);
    assert_eq!(root.free_kb, 680_856);

    // A mount point with a space survives.
    assert_eq!(rows[2].mount_point, "/mnt/sd card");
}

#[test]
fn test_mount_point_spacing_survives_byte_exact() {
    let input =
        "Filesystem 1K-blocks Used Available Use% Mounted on\n/dev/sd1 10 2 8 20% /mnt/two  spaces\n";
    let rows = parse_disk_usage(input).expect("df");
    assert_eq!(rows[0].mount_point, "/mnt/two  spaces");
}

#[test]
fn test_df_without_rows_is_empty_output() {
    assert_eq!(parse_disk_usage("").unwrap_err(), ParseError::EmptyOutput);
    let header_only = "Filesystem 1K-blocks Used Available Use% Mounted on\n";
    assert_eq!(
        parse_disk_usage(header_only).unwrap_err(),
        ParseError::EmptyOutput
    );
}

#[test]
fn test_df_short_row_reports_column_count() {
    let input = "Filesystem 1K-blocks Used Available Use% Mounted on\n/dev/root 123 45\n";
    let err = parse_disk_usage(input).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedColumnCount {
            line: "/dev/root 123 45".to_string(),
            expected: 6,
            found: 3,
        }
    );
}

#[test]
fn test_df_garbled_number_is_invalid_field() {
    let input = "Filesystem 1K-blocks Used Available Use% Mounted on\n/dev/root big 45 6 7% /\n";
    let err = parse_disk_usage(input).unwrap_err();
    assert!(matches!(
        err,
        ParseError::InvalidField {
            field: "blocks",
            ..
        }
    ));
}

#[test]
fn test_parses_du_total() {
    assert_eq!(parse_folder_usage("5204\t/sdcard/music\n").expect("du"), 5204);
    assert_eq!(parse_folder_usage("0 /empty\n").expect("du"), 0);
}

#[test]
fn test_du_garbage_errors() {
    assert_eq!(parse_folder_usage("").unwrap_err(), ParseError::EmptyOutput);
    assert!(matches!(
        parse_folder_usage("lots /sdcard\n").unwrap_err(),
        ParseError::InvalidField {
            field: "kilobytes",
            ..
        }
    ));
}
