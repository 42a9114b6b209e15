//! Decodes `df` and `du -s -k` output.

use explorer_error::ParseError;

use crate::model::DiskUsage;

/// Parses the `df` table into one [`DiskUsage`] per mounted filesystem.
///
/// Expects the POSIX six-column layout with a header line: filesystem,
/// 1K-blocks, used, available, capacity, mount point. Mount points keep
/// internal whitespace.
pub fn parse_disk_usage(stdout: &str) -> Result<Vec<DiskUsage>, ParseError> {
    let mut lines = stdout.lines().filter(|line| !line.trim().is_empty());
    // Header.
    lines.next().ok_or(ParseError::EmptyOutput)?;

    let mut rows = Vec::new();
    for line in lines {
        // Take the five leading columns; the remainder is the mount
        // point, kept byte-exact so runs of spaces survive.
        let mut rest = line;
        let mut fields = [""; 5];
        for (found, slot) in fields.iter_mut().enumerate() {
            let trimmed = rest.trim_start();
            let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
            let (token, tail) = trimmed.split_at(end);
            if token.is_empty() {
                return Err(short_row(line, found));
            }
            *slot = token;
            rest = tail;
        }
        let mount_point = rest.trim();
        if mount_point.is_empty() {
            return Err(short_row(line, 5));
        }
        rows.push(DiskUsage {
            filesystem: fields[0].to_string(),
            total_kb: parse_kb("blocks", fields[1])?,
            used_kb: parse_kb("used", fields[2])?,
            free_kb: parse_kb("available", fields[3])?,
            mount_point: mount_point.to_string(),
        });
    }
    if rows.is_empty() {
        return Err(ParseError::EmptyOutput);
    }
    Ok(rows)
}

/// Parses `du -s -k` output into a kilobyte total.
pub fn parse_folder_usage(stdout: &str) -> Result<u64, ParseError> {
    let line = stdout
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or(ParseError::EmptyOutput)?;
    let raw = line
        .split_whitespace()
        .next()
        .ok_or(ParseError::EmptyOutput)?;
    parse_kb("kilobytes", raw)
}

fn short_row(line: &str, found: usize) -> ParseError {
    ParseError::UnexpectedColumnCount {
        line: line.to_string(),
        expected: 6,
        found,
    }
}

fn parse_kb(field: &'static str, raw: &str) -> Result<u64, ParseError> {
    raw.parse().map_err(|_| ParseError::InvalidField {
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
#[path = "diskusage.test.rs"]
mod tests;
