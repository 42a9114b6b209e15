//! Decodes `ls -a -l` output.

use chrono::NaiveDateTime;
use explorer_error::ParseError;

use crate::model::FileEntry;
use crate::model::FileType;
use crate::model::Permissions;

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const SYMLINK_SEPARATOR: &str = " -> ";

/// Parses a long listing into one [`FileEntry`] per row.
///
/// Accepts the minimal row layout of embedded `ls` builds: mode, owner,
/// group, then a byte size
/// for regular files or a `major, minor` pair for device nodes (other
/// types print neither), then `YYYY-MM-DD HH:MM`, then the name. Names
/// keep their internal whitespace; symlink names split on ` -> `.
/// A leading `total N` line is skipped.
pub fn parse_listing(stdout: &str) -> Result<Vec<FileEntry>, ParseError> {
    let mut entries = Vec::new();
    for line in stdout.lines() {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with("total ") {
            continue;
        }
        entries.push(parse_row(line)?);
    }
    Ok(entries)
}

fn parse_row(line: &str) -> Result<FileEntry, ParseError> {
    let mut cursor = Cursor::new(line);

    let mode = cursor.field()?;
    let mut mode_chars = mode.chars();
    let file_type = mode_chars
        .next()
        .and_then(FileType::from_unix_id)
        .ok_or_else(|| ParseError::InvalidField {
            field: "file type",
            value: mode.to_string(),
        })?;
    let permissions = Permissions::from_symbolic(&mode_chars.as_str()[..mode.len().min(10) - 1])?;

    let user = cursor.field()?.to_string();
    let group = cursor.field()?.to_string();

    let mut size = 0u64;
    let mut device = None;
    if file_type.is_device() {
        let major = cursor.field()?;
        let major = major
            .strip_suffix(',')
            .and_then(|m| m.parse().ok())
            .ok_or_else(|| invalid("major device number", major))?;
        let minor = cursor.field()?;
        let minor = minor
            .parse()
            .map_err(|_| invalid("minor device number", minor))?;
        device = Some((major, minor));
    } else if file_type == FileType::Regular {
        let raw = cursor.field()?;
        size = raw.parse().map_err(|_| invalid("size", raw))?;
    }

    let date = cursor.field()?;
    let time = cursor.field()?;
    let stamp = format!("{date} {time}");
    let modified = NaiveDateTime::parse_from_str(&stamp, DATE_TIME_FORMAT)
        .map_err(|_| invalid("modification time", &stamp))?;

    let rest = cursor.rest();
    if rest.is_empty() {
        return Err(cursor.short_line());
    }
    let (name, link_target) = if file_type == FileType::Symlink
        && let Some((name, target)) = rest.split_once(SYMLINK_SEPARATOR)
    {
        (name.to_string(), Some(target.to_string()))
    } else {
        (rest.to_string(), None)
    };

    Ok(FileEntry {
        name,
        file_type,
        permissions,
        user,
        group,
        size,
        device,
        modified: Some(modified),
        link_target,
    })
}

fn invalid(field: &'static str, value: &str) -> ParseError {
    ParseError::InvalidField {
        field,
        value: value.to_string(),
    }
}

/// Whitespace tokenizer that keeps the unconsumed remainder addressable,
/// so the trailing name field can keep its internal spaces.
struct Cursor<'a> {
    line: &'a str,
    rest: &'a str,
    consumed: usize,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            rest: line,
            consumed: 0,
        }
    }

    fn field(&mut self) -> Result<&'a str, ParseError> {
        let trimmed = self.rest.trim_start();
        if trimmed.is_empty() {
            return Err(self.short_line());
        }
        let end = trimmed
            .find(char::is_whitespace)
            .unwrap_or(trimmed.len());
        let (token, rest) = trimmed.split_at(end);
        self.rest = rest;
        self.consumed += 1;
        Ok(token)
    }

    fn rest(&self) -> &'a str {
        self.rest.trim_start()
    }

    fn short_line(&self) -> ParseError {
        ParseError::UnexpectedColumnCount {
            line: self.line.to_string(),
            expected: self.consumed + 1,
            found: self.consumed,
        }
    }
}

#[cfg(test)]
#[path = "listing.test.rs"]
mod tests;
