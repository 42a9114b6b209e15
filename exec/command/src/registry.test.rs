#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_ids_are_unique() {
    let ids: HashSet<&str> = ALL.iter().map(|spec| spec.id).collect();
    assert_eq!(ids.len(), ALL.len());
}

#[test]
fn test_find_known_and_unknown() {
    let spec = find("createdir").expect("createdir registered");
    assert_eq!(spec.template, "mkdir {0}");
    assert!(find("shred").is_none());
}

#[test]
fn test_writable_arg_within_placeholder_range() {
    for spec in ALL {
        if let Some(idx) = spec.writable_arg {
            assert!(
                idx < spec.placeholder_count(),
                "{}: writable arg {idx} out of range",
                spec.id
            );
        }
    }
}

#[test]
fn test_only_remount_requires_elevation() {
    for spec in ALL {
        assert_eq!(spec.requires_elevation, spec.id == "remountrw", "{}", spec.id);
    }
}
