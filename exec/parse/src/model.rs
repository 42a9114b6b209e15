//! Typed views of what the filesystem utilities print.

use chrono::NaiveDateTime;
use explorer_error::ParseError;
use serde::Deserialize;
use serde::Serialize;

/// What a listing row describes, keyed by the first character of its
/// mode string.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Regular,
    Directory,
    Symlink,
    BlockDevice,
    CharDevice,
    Fifo,
    Socket,
}

impl FileType {
    /// Decodes the leading character of a mode string.
    pub fn from_unix_id(id: char) -> Option<Self> {
        match id {
            '-' => Some(Self::Regular),
            'd' => Some(Self::Directory),
            'l' => Some(Self::Symlink),
            'b' => Some(Self::BlockDevice),
            'c' => Some(Self::CharDevice),
            'p' => Some(Self::Fifo),
            's' => Some(Self::Socket),
            _ => None,
        }
    }

    /// The character a mode string uses for this type.
    pub fn unix_id(self) -> char {
        match self {
            Self::Regular => '-',
            Self::Directory => 'd',
            Self::Symlink => 'l',
            Self::BlockDevice => 'b',
            Self::CharDevice => 'c',
            Self::Fifo => 'p',
            Self::Socket => 's',
        }
    }

    /// Whether rows of this type carry a `major, minor` pair where other
    /// rows carry a byte size.
    pub fn is_device(self) -> bool {
        matches!(self, Self::BlockDevice | Self::CharDevice)
    }
}

/// The twelve permission bits, convertible between the nine-character
/// symbolic form and octal.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Permissions {
    mode: u16,
}

const SETUID: u16 = 0o4000;
const SETGID: u16 = 0o2000;
const STICKY: u16 = 0o1000;

impl Permissions {
    /// Wraps a raw mode. Bits above the permission range are discarded.
    pub fn from_mode(mode: u16) -> Self {
        Self {
            mode: mode & 0o7777,
        }
    }

    /// The raw permission bits.
    pub fn mode(self) -> u16 {
        self.mode
    }

    /// Decodes the nine-character `rwxr-xr-x` form, including the
    /// `s`/`S`/`t`/`T` spellings for setuid, setgid, and sticky.
    pub fn from_symbolic(symbolic: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidField {
            field: "permissions",
            value: symbolic.to_string(),
        };
        let chars: Vec<char> = symbolic.chars().collect();
        if chars.len() != 9 {
            return Err(invalid());
        }

        let mut mode = 0u16;
        for (i, &c) in chars.iter().enumerate() {
            let bit = 0o400 >> i;
            let expected = if i % 3 == 0 { 'r' } else { 'w' };
            if i % 3 == 2 {
                // The execute slot doubles as the special-bit indicator.
                let special = match i / 3 {
                    0 => SETUID,
                    1 => SETGID,
                    _ => STICKY,
                };
                let special_char = if i / 3 == 2 { 't' } else { 's' };
                match c {
                    'x' => mode |= bit,
                    '-' => {}
                    c if c == special_char => mode |= bit | special,
                    c if c == special_char.to_ascii_uppercase() => mode |= special,
                    _ => return Err(invalid()),
                }
            } else if c == expected {
                mode |= bit;
            } else if c != '-' {
                return Err(invalid());
            }
        }
        Ok(Self { mode })
    }

    /// The nine-character symbolic form.
    pub fn symbolic(self) -> String {
        let mut out = String::with_capacity(9);
        for i in 0..9usize {
            let bit = 0o400 >> i;
            let set = self.mode & bit != 0;
            let c = match i % 3 {
                0 => {
                    if set { 'r' } else { '-' }
                }
                1 => {
                    if set { 'w' } else { '-' }
                }
                _ => {
                    let (special, on, off) = match i / 3 {
                        0 => (SETUID, 's', 'S'),
                        1 => (SETGID, 's', 'S'),
                        _ => (STICKY, 't', 'T'),
                    };
                    if self.mode & special != 0 {
                        if set { on } else { off }
                    } else if set {
                        'x'
                    } else {
                        '-'
                    }
                }
            };
            out.push(c);
        }
        out
    }

    /// The four-digit octal form, suitable as a `chmod` argument.
    pub fn octal(self) -> String {
        format!("{:04o}", self.mode)
    }

    /// Decodes an octal mode of up to four digits.
    pub fn from_octal(octal: &str) -> Result<Self, ParseError> {
        let ok = octal.len() <= 4 && !octal.is_empty();
        match u16::from_str_radix(octal, 8) {
            Ok(mode) if ok => Ok(Self::from_mode(mode)),
            _ => Err(ParseError::InvalidField {
                field: "octal mode",
                value: octal.to_string(),
            }),
        }
    }
}

/// One row of a long directory listing.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub file_type: FileType,
    pub permissions: Permissions,
    pub user: String,
    pub group: String,
    /// Byte size. Zero for rows that print none (directories, devices).
    pub size: u64,
    /// Device numbers, present only for block and character devices.
    pub device: Option<(u32, u32)>,
    /// Modification time, when the row carried a decodable one.
    pub modified: Option<NaiveDateTime>,
    /// Resolution target, present only for symlinks.
    pub link_target: Option<String>,
}

/// One row of the mounted-filesystem usage table, figures in kilobytes.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DiskUsage {
    pub filesystem: String,
    pub mount_point: String,
    pub total_kb: u64,
    pub used_kb: u64,
    pub free_kb: u64,
}

#[cfg(test)]
#[path = "model.test.rs"]
mod tests;
