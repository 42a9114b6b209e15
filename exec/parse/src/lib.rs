//! Pure decoders for the stdout of the filesystem utilities.
//!
//! Parsers are stateless and keyed by command id; they never touch the
//! filesystem or a console. A garbled payload from a command that exited
//! 0 is a [`ParseError`], kept distinct from execution failures.

use explorer_error::ParseError;

pub mod diskusage;
pub mod listing;
pub mod model;

pub use diskusage::{parse_disk_usage, parse_folder_usage};
pub use listing::parse_listing;
pub use model::{DiskUsage, FileEntry, FileType, Permissions};

/// Decoded stdout, one variant per structured command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedOutput {
    WorkingDirectory(String),
    Listing(Vec<FileEntry>),
    DiskUsage(Vec<DiskUsage>),
    FolderUsage(u64),
}

/// Dispatches stdout to the parser registered for `id`.
///
/// Ids follow the command registry; an id with no structured output is
/// an [`ParseError::InvalidField`] on the caller's part.
pub fn parse_for(id: &str, stdout: &str) -> Result<ParsedOutput, ParseError> {
    match id {
        "pwd" => {
            let dir = stdout.trim();
            if dir.is_empty() {
                return Err(ParseError::EmptyOutput);
            }
            Ok(ParsedOutput::WorkingDirectory(dir.to_string()))
        }
        "ls" => Ok(ParsedOutput::Listing(parse_listing(stdout)?)),
        "diskusage" => Ok(ParsedOutput::DiskUsage(parse_disk_usage(stdout)?)),
        "folderusage" => Ok(ParsedOutput::FolderUsage(parse_folder_usage(stdout)?)),
        other => Err(ParseError::InvalidField {
            field: "command id",
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "lib.test.rs"]
mod tests;
