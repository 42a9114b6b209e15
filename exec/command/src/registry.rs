//! The static command registry.
//!
//! One [`CommandSpec`] per filesystem operation the core knows how to run,
//! created at compile time and shared by reference for the life of the
//! process.

use crate::spec::CommandSpec;

/// Print the working directory.
pub static PWD: CommandSpec = CommandSpec {
    id: "pwd",
    template: "pwd",
    requires_elevation: false,
    structured_output: false,
    writable_arg: None,
};

/// Long listing of a directory, hidden entries included.
pub static LIST_DIR: CommandSpec = CommandSpec {
    id: "ls",
    template: "ls -a -l {0}",
    requires_elevation: false,
    structured_output: true,
    writable_arg: None,
};

/// Create a directory.
pub static CREATE_DIR: CommandSpec = CommandSpec {
    id: "createdir",
    template: "mkdir {0}",
    requires_elevation: false,
    structured_output: false,
    writable_arg: Some(0),
};

/// Create an empty file.
pub static CREATE_FILE: CommandSpec = CommandSpec {
    id: "createfile",
    template: "touch {0}",
    requires_elevation: false,
    structured_output: false,
    writable_arg: Some(0),
};

/// Delete a single file.
pub static DELETE_FILE: CommandSpec = CommandSpec {
    id: "deletefile",
    template: "rm -f {0}",
    requires_elevation: false,
    structured_output: false,
    writable_arg: Some(0),
};

/// Delete a directory tree.
pub static DELETE_DIR: CommandSpec = CommandSpec {
    id: "deletedir",
    template: "rm -r -f {0}",
    requires_elevation: false,
    structured_output: false,
    writable_arg: Some(0),
};

/// Move or rename.
pub static MOVE: CommandSpec = CommandSpec {
    id: "move",
    template: "mv {0} {1}",
    requires_elevation: false,
    structured_output: false,
    writable_arg: Some(1),
};

/// Recursive copy.
pub static COPY: CommandSpec = CommandSpec {
    id: "copy",
    template: "cp -r -f {0} {1}",
    requires_elevation: false,
    structured_output: false,
    writable_arg: Some(1),
};

/// Change permission bits (octal mode, then path).
pub static CHMOD: CommandSpec = CommandSpec {
    id: "chmod",
    template: "chmod {0} {1}",
    requires_elevation: false,
    structured_output: false,
    writable_arg: Some(1),
};

/// Disk usage of every mounted filesystem.
pub static DISK_USAGE: CommandSpec = CommandSpec {
    id: "diskusage",
    template: "df",
    requires_elevation: false,
    structured_output: true,
    writable_arg: None,
};

/// Aggregate size of a directory tree, in kilobytes.
pub static FOLDER_USAGE: CommandSpec = CommandSpec {
    id: "folderusage",
    template: "du -s -k {0}",
    requires_elevation: false,
    structured_output: true,
    writable_arg: None,
};

/// Remount a filesystem read-write. The remediation for
/// [`explorer_error::ExecError::ReadOnlyFilesystem`]; needs root.
pub static REMOUNT_RW: CommandSpec = CommandSpec {
    id: "remountrw",
    template: "mount -o remount,rw {0}",
    requires_elevation: true,
    structured_output: false,
    writable_arg: None,
};

/// Every registered spec.
pub static ALL: &[&CommandSpec] = &[
    &PWD,
    &LIST_DIR,
    &CREATE_DIR,
    &CREATE_FILE,
    &DELETE_FILE,
    &DELETE_DIR,
    &MOVE,
    &COPY,
    &CHMOD,
    &DISK_USAGE,
    &FOLDER_USAGE,
    &REMOUNT_RW,
];

/// Looks up a spec by id.
pub fn find(id: &str) -> Option<&'static CommandSpec> {
    ALL.iter().copied().find(|spec| spec.id == id)
}

#[cfg(test)]
#[path = "registry.test.rs"]
mod tests;
