#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;

use super::*;

#[test]
fn test_root_is_its_own_mount_point() {
    assert_eq!(mount_point_of(Path::new("/")), Some(PathBuf::from("/")));
}

#[test]
fn test_nonexistent_leaf_resolves_through_parent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("not/created/yet");
    let mount = mount_point_of(&missing).expect("resolves via existing ancestor");
    assert!(missing.starts_with(&mount) || mount == Path::new("/"));
}

#[test]
fn test_existing_path_resolves_to_ancestor() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mount = mount_point_of(dir.path()).expect("resolves");
    assert!(dir.path().starts_with(&mount));
}
