//! Line-ending detection and resolution.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use memchr::memchr_iter;

use crate::error::SortError;

/// A line-ending style, either configured or detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// Use the host platform's line separator.
    Auto,
    /// Preserve the file's detected line ending; fails on `Unknown`.
    Keep,
    Lf,
    Crlf,
    Cr,
    /// Detection found no strict majority (or no line terminators at all).
    Unknown,
}

impl LineEnding {
    /// The terminator characters, if this variant is a concrete style.
    pub fn chars(self) -> Option<&'static str> {
        match self {
            LineEnding::Auto => Some(host_line_separator()),
            LineEnding::Lf => Some("\n"),
            LineEnding::Crlf => Some("\r\n"),
            LineEnding::Cr => Some("\r"),
            LineEnding::Keep | LineEnding::Unknown => None,
        }
    }

    /// The most frequent line-ending style in `content`, counting
    /// non-overlapping occurrences of `\r\n`, bare `\r`, and bare `\n`.
    /// Returns `Unknown` on a tie or when no terminator occurs.
    pub fn determine(content: &str) -> LineEnding {
        let bytes = content.as_bytes();
        let mut lf = 0usize;
        let mut crlf = 0usize;
        for i in memchr_iter(b'\n', bytes) {
            if i > 0 && bytes[i - 1] == b'\r' {
                crlf += 1;
            } else {
                lf += 1;
            }
        }
        let cr = memchr_iter(b'\r', bytes)
            .filter(|&i| bytes.get(i + 1) != Some(&b'\n'))
            .count();

        if lf > cr && lf > crlf {
            LineEnding::Lf
        } else if crlf > lf && crlf > cr {
            LineEnding::Crlf
        } else if cr > lf && cr > crlf {
            LineEnding::Cr
        } else {
            LineEnding::Unknown
        }
    }

    /// Resolve a configured line ending against file content. `Auto` binds
    /// to the host default and `Keep` to the detected style; `Keep` fails
    /// when detection returns `Unknown`.
    pub fn resolve(self, path: &Path, content: &str) -> Result<&'static str, SortError> {
        match self {
            LineEnding::Keep => match LineEnding::determine(content) {
                LineEnding::Unknown => Err(SortError::UnknownLineEnding {
                    path: path.to_path_buf(),
                }),
                detected => Ok(detected.chars().expect("detected style is concrete")),
            },
            other => other.chars().ok_or(SortError::UnknownLineEnding {
                path: path.to_path_buf(),
            }),
        }
    }
}

fn host_line_separator() -> &'static str {
    if cfg!(windows) { "\r\n" } else { "\n" }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AUTO" => Ok(LineEnding::Auto),
            "KEEP" => Ok(LineEnding::Keep),
            "LF" => Ok(LineEnding::Lf),
            "CRLF" => Ok(LineEnding::Crlf),
            "CR" => Ok(LineEnding::Cr),
            other => Err(format!("invalid line ending ({other})")),
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineEnding::Auto => "AUTO",
            LineEnding::Keep => "KEEP",
            LineEnding::Lf => "LF",
            LineEnding::Crlf => "CRLF",
            LineEnding::Cr => "CR",
            LineEnding::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}
