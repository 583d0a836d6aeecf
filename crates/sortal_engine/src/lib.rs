//! Core import-section transformer.
//!
//! Rewrites the import section of a Java source file into a canonical
//! order defined by user-supplied group prefixes, and optionally deletes
//! imports whose referenced identifier never appears in the file body.
//! Given `(bytes, config)` the [`Sorter`] returns a [`SortResult`]; it
//! performs no I/O and holds no mutable state, so files can be processed
//! concurrently by the driver.

pub mod compare;
mod error;
mod group;
mod grouper;
mod import;
mod line_ending;
mod result;
mod section;
mod unused;

pub use error::SortError;
pub use group::{Group, GroupError, parse_groups};
pub use grouper::Grouper;
pub use import::{Import, ImportSet};
pub use line_ending::LineEnding;
pub use result::{SortResult, SourceEncoding};
pub use sortal_java_parser::LanguageLevel;

use std::path::Path;

use sortal_java_parser::{JavaParser, collect_problems};

/// Configured entry point: parses one file's bytes and produces the
/// canonical import section.
#[derive(Debug)]
pub struct Sorter {
    encoding: SourceEncoding,
    grouper: Grouper,
    remove_unused: bool,
    treat_same_package_as_unused: bool,
    line_ending: LineEnding,
    language_level: LanguageLevel,
}

impl Sorter {
    pub fn new(
        encoding: SourceEncoding,
        grouper: Grouper,
        remove_unused: bool,
        treat_same_package_as_unused: bool,
        line_ending: LineEnding,
        language_level: LanguageLevel,
    ) -> Self {
        Self {
            encoding,
            grouper,
            remove_unused,
            treat_same_package_as_unused,
            line_ending,
            language_level,
        }
    }

    /// Parse `bytes` as the content of `path` and compute the canonical
    /// import section. Deterministic: identical inputs yield identical
    /// results.
    pub fn parse_file(&self, path: &Path, bytes: &[u8]) -> Result<SortResult, SortError> {
        let content = self.encoding.decode(bytes);
        if content.trim().is_empty() {
            // canonical empty result, before line-ending resolution so
            // KEEP does not fail on an empty file
            return Ok(SortResult::empty(
                path.to_path_buf(),
                self.encoding,
                self.line_ending.chars().unwrap_or("\n"),
            ));
        }

        let eol = self.line_ending.resolve(path, &content)?;
        let file_lines = split_lines(&content);
        // the tree is parsed from the newline-joined lines, so positions
        // are terminator-independent
        let source = file_lines.join("\n");

        let mut parser = JavaParser::with_language_level(self.language_level.clone());
        let Some(parsed) = parser.parse(&source) else {
            return Err(SortError::UnableToParse {
                path: path.to_path_buf(),
            });
        };
        let root = parsed.tree.root_node();

        if has_relevant_problems(root) {
            return Err(SortError::PartialParse {
                path: path.to_path_buf(),
            });
        }

        let mut section = section::locate(root, &source, &file_lines, eol);

        if self.remove_unused {
            let tokens = unused::tokens_in_use(root, &source);
            unused::remove_unused_imports(&mut section.imports, &tokens);
            if self.treat_same_package_as_unused {
                let package = section::package_name(root, &source);
                unused::remove_same_package_imports(&mut section.imports, package);
            }
        }

        let mut new_section = self.grouper.grouped_imports(&section.imports, eol);
        if section.start > 0 {
            // blank line before the imports, as long as they are not at
            // the start of the file
            new_section.insert_str(0, eol);
        }
        if section.stop < file_lines.len() {
            // blank line after the imports, as long as more file follows
            new_section.push_str(eol);
        }

        Ok(SortResult::new(
            path.to_path_buf(),
            self.encoding,
            eol,
            file_lines,
            section.start,
            section.stop,
            section.original,
            new_section,
            section.imports.into_vec(),
        ))
    }
}

/// Whether the parse reported problems above the first top-level type
/// declaration. Problems after it are ignored; they reflect post-import
/// syntax the sorter does not care about.
fn has_relevant_problems(root: tree_sitter::Node) -> bool {
    let problems = collect_problems(root);
    if problems.is_empty() {
        return false;
    }
    let first_type_begin = first_type_declaration_begin(root);
    match first_type_begin {
        Some((row, column)) => problems
            .iter()
            .any(|p| (p.row, p.column) < (row, column)),
        None => true,
    }
}

fn first_type_declaration_begin(root: tree_sitter::Node) -> Option<(usize, usize)> {
    let mut cursor = root.walk();
    root.children(&mut cursor)
        .filter(|child| {
            matches!(
                child.kind(),
                "class_declaration"
                    | "interface_declaration"
                    | "enum_declaration"
                    | "record_declaration"
                    | "annotation_type_declaration"
            )
        })
        .map(|child| {
            let pos = child.start_position();
            (pos.row, pos.column)
        })
        .min()
}

/// Split content into lines on `\r\n`, bare `\r`, or bare `\n`, without
/// the terminators and without a trailing empty line.
fn split_lines(content: &str) -> Vec<String> {
    let mut lines = vec![];
    let mut current = String::new();
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => lines.push(std::mem::take(&mut current)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\nb\r\n"), vec!["a", "b"]);
        assert_eq!(split_lines("a\rb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines(""), Vec::<String>::new());
    }
}
