//! Mount point resolution for write targets.

use std::path::Path;
use std::path::PathBuf;

/// Resolves the mount point of the filesystem holding `path`.
///
/// Walks from the nearest existing ancestor upward until the device id
/// changes, so it works for paths whose final components do not exist yet
/// (the usual case when a create failed). Returns `None` when nothing
/// along the path can be inspected.
#[cfg(unix)]
pub fn mount_point_of(path: &Path) -> Option<PathBuf> {
    use std::os::unix::fs::MetadataExt;

    let mut current = std::path::absolute(path).ok()?;
    while !current.exists() {
        current = current.parent()?.to_path_buf();
    }

    let dev = std::fs::metadata(&current).ok()?.dev();
    loop {
        let Some(parent) = current.parent() else {
            // Reached "/", which is its own mount point.
            return Some(current);
        };
        let parent_dev = std::fs::metadata(parent).ok()?.dev();
        if parent_dev != dev {
            return Some(current);
        }
        current = parent.to_path_buf();
    }
}

#[cfg(not(unix))]
pub fn mount_point_of(_path: &Path) -> Option<PathBuf> {
    None
}

#[cfg(test)]
#[path = "mount.test.rs"]
mod tests;
