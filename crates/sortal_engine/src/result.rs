//! The outcome of processing one file, and the splice that renders the
//! rewritten file bytes.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::import::Import;

/// Character encoding of the source bytes.
///
/// Decoding is lossy (unmappable bytes become replacement characters), so
/// it never fails; files that decode losslessly round-trip byte-exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceEncoding {
    #[default]
    Utf8,
    Iso8859_1,
}

impl SourceEncoding {
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            SourceEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            SourceEncoding::Iso8859_1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }

    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            SourceEncoding::Utf8 => text.as_bytes().to_vec(),
            SourceEncoding::Iso8859_1 => text
                .chars()
                .map(|c| if (c as u32) < 0x100 { c as u8 } else { b'?' })
                .collect(),
        }
    }
}

impl FromStr for SourceEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('_', "-").as_str() {
            "UTF-8" | "UTF8" => Ok(SourceEncoding::Utf8),
            "ISO-8859-1" | "ISO8859-1" | "LATIN1" | "LATIN-1" => Ok(SourceEncoding::Iso8859_1),
            other => Err(format!("unsupported encoding ({other})")),
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceEncoding::Utf8 => "UTF-8",
            SourceEncoding::Iso8859_1 => "ISO-8859-1",
        })
    }
}

/// The result of parsing and regrouping one file's imports.
#[derive(Debug)]
pub struct SortResult {
    path: PathBuf,
    encoding: SourceEncoding,
    eol: &'static str,
    file_lines: Vec<String>,
    start: usize,
    stop: usize,
    original_section: String,
    new_section: String,
    imports: Vec<Import>,
}

impl SortResult {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        path: PathBuf,
        encoding: SourceEncoding,
        eol: &'static str,
        file_lines: Vec<String>,
        start: usize,
        stop: usize,
        original_section: String,
        new_section: String,
        imports: Vec<Import>,
    ) -> Self {
        Self {
            path,
            encoding,
            eol,
            file_lines,
            start,
            stop,
            original_section,
            new_section,
            imports,
        }
    }

    /// The canonical empty result for an empty file.
    pub(crate) fn empty(path: PathBuf, encoding: SourceEncoding, eol: &'static str) -> Self {
        Self::new(
            path,
            encoding,
            eol,
            vec![],
            0,
            0,
            String::new(),
            String::new(),
            vec![],
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The surviving imports after duplicate merging and unused removal,
    /// in the order they appeared in the file.
    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    pub fn original_section(&self) -> &str {
        &self.original_section
    }

    pub fn new_section(&self) -> &str {
        &self.new_section
    }

    /// Whether the file's import section is already canonical.
    pub fn is_sorted(&self) -> bool {
        self.original_section == self.new_section
    }

    /// The full rewritten file content: everything outside the section is
    /// untouched, the section is replaced, and every line is terminated
    /// with the chosen EOL.
    pub fn sorted_content(&self) -> String {
        if self.file_lines.is_empty() {
            return String::new();
        }
        let mut section_lines: Vec<&str> = self.new_section.split(self.eol).collect();
        // drop the empty fragments after the section's final terminator
        while section_lines.last() == Some(&"") {
            section_lines.pop();
        }

        let mut lines: Vec<&str> = vec![];
        lines.extend(self.file_lines[..self.start].iter().map(String::as_str));
        lines.extend(section_lines);
        if self.stop < self.file_lines.len() {
            // the section's trailing terminator was consumed by the split;
            // restore the blank line it represented
            lines.push("");
        }
        lines.extend(self.file_lines[self.stop..].iter().map(String::as_str));

        let mut out = lines.join(self.eol);
        out.push_str(self.eol);
        out
    }

    /// The rewritten file encoded in the source encoding.
    pub fn sorted_bytes(&self) -> Vec<u8> {
        self.encoding.encode(&self.sorted_content())
    }
}
