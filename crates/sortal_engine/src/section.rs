//! Locating the import section and folding its nodes into import values.
//!
//! The section is the contiguous line range covering all import
//! declarations, their attached comments, the orphan comments interleaved
//! between them, and the surrounding blank padding.

use std::collections::HashSet;

use tree_sitter::{Node, Point};

use crate::import::{Import, ImportSet};

/// The located import section of one file.
#[derive(Debug)]
pub(crate) struct Section {
    /// First line of the section, 0-based inclusive.
    pub(crate) start: usize,
    /// One past the last line of the section, 0-based exclusive.
    pub(crate) stop: usize,
    /// Byte-exact text of the original section lines, `eol`-joined and
    /// `eol`-terminated. Empty when the file has no imports.
    pub(crate) original: String,
    /// The imports in file order, duplicates merged.
    pub(crate) imports: ImportSet,
}

/// Nodes making up the import section, in position order.
enum SectionNode<'a> {
    Comment(Node<'a>),
    Import(Node<'a>),
}

impl SectionNode<'_> {
    fn begin(&self) -> Point {
        match self {
            SectionNode::Comment(n) | SectionNode::Import(n) => n.start_position(),
        }
    }

    fn end(&self) -> Point {
        match self {
            SectionNode::Comment(n) | SectionNode::Import(n) => n.end_position(),
        }
    }
}

/// Locate the import section and convert it. `source` must be the
/// newline-joined form of `file_lines`, the text the tree was parsed from.
pub(crate) fn locate(root: Node, source: &str, file_lines: &[String], eol: &str) -> Section {
    let import_nodes = import_declarations(root);
    if import_nodes.is_empty() {
        // No imports: an empty section spanning the whole file, so the
        // result compares equal and nothing is rewritten
        return Section {
            start: 0,
            stop: file_lines.len(),
            original: String::new(),
            imports: ImportSet::new(),
        };
    }

    let package = package_declaration(root);
    let package_pos = package
        .map(|p| p.end_position())
        .or_else(|| root.child(0).map(|c| c.start_position()))
        .unwrap_or(Point::new(0, 0));
    let package_row = package.map(|p| p.end_position().row);

    let last_import_begin = import_nodes
        .iter()
        .map(|n| n.start_position())
        .max()
        .expect("non-empty import list");

    let comments = comment_nodes(root);

    // Trailing same-line comments belong to the import they follow. A
    // claimed comment leaves the node stream, so the range must still
    // cover every line it spans (a block comment may run past its import)
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut suffixes: Vec<String> = Vec::with_capacity(import_nodes.len());
    let mut suffix_stop = 0usize;
    for import in &import_nodes {
        let end = import.end_position();
        let mut parts = vec![];
        for comment in &comments {
            let begin = comment.start_position();
            if begin.row == end.row && begin > end {
                parts.push(node_text(*comment, source));
                claimed.insert(comment.id());
                suffix_stop = suffix_stop.max(comment.end_position().row + 1);
            }
        }
        suffixes.push(parts.join(" "));
    }

    let mut nodes: Vec<SectionNode> = vec![];
    for comment in &comments {
        if claimed.contains(&comment.id()) {
            continue;
        }
        let begin = comment.start_position();
        // A comment on the package line is the package's, not an orphan
        if package_row == Some(begin.row) {
            continue;
        }
        if begin > package_pos && begin < last_import_begin {
            nodes.push(SectionNode::Comment(*comment));
            claimed.insert(comment.id());
        }
    }

    // The comment directly above the first import attaches to it even when
    // it falls outside the orphan window (first import in a file without a
    // package declaration)
    let first_import_row = import_nodes
        .iter()
        .map(|n| n.start_position().row)
        .min()
        .expect("non-empty import list");
    if let Some(adjacent) = comments.iter().find(|c| {
        !claimed.contains(&c.id())
            && c.end_position().row + 1 == first_import_row
            && package_row != Some(c.start_position().row)
    }) {
        nodes.push(SectionNode::Comment(*adjacent));
    }

    for import in &import_nodes {
        nodes.push(SectionNode::Import(*import));
    }
    nodes.sort_by_key(SectionNode::begin);

    let mut start = nodes.first().expect("section has nodes").begin().row;
    let mut stop = nodes.last().expect("section has nodes").end().row + 1;
    stop = stop.max(suffix_stop);

    // Include the surrounding blank padding
    while start > 0 && file_lines[start - 1].trim().is_empty() {
        start -= 1;
    }
    while stop < file_lines.len() && file_lines[stop].trim().is_empty() {
        stop += 1;
    }

    let mut original = file_lines[start..stop].join(eol);
    original.push_str(eol);

    let imports = convert(&nodes, &suffixes, &import_nodes, source);

    Section {
        start,
        stop,
        original,
        imports,
    }
}

/// Fold the position-sorted node stream into import values, attaching each
/// buffered comment to the next following import as a prefix.
fn convert(
    nodes: &[SectionNode],
    suffixes: &[String],
    import_nodes: &[Node],
    source: &str,
) -> ImportSet {
    let mut imports = ImportSet::new();
    let mut recent_comments: Vec<String> = vec![];

    for node in nodes {
        match node {
            SectionNode::Comment(c) => recent_comments.push(node_text(*c, source)),
            SectionNode::Import(n) => {
                let Some((is_static, path)) = parse_import_declaration(*n, source) else {
                    // Malformed declaration; parse problems are reported
                    // upstream before we get here
                    recent_comments.clear();
                    continue;
                };
                let prefix = recent_comments.join("\n").trim().to_string();
                recent_comments.clear();

                let index = import_nodes
                    .iter()
                    .position(|i| i.id() == n.id())
                    .expect("import node came from import_nodes");
                let trailing = suffixes[index].trim();
                let suffix = if trailing.is_empty() {
                    String::new()
                } else {
                    format!(" {trailing}")
                };

                imports.add(Import::new(is_static, path, prefix, suffix));
            }
        }
    }

    assert!(
        recent_comments.is_empty(),
        "stray comments after the last import: {recent_comments:?}"
    );
    imports
}

/// Top-level import declarations, in tree order.
fn import_declarations(root: Node) -> Vec<Node> {
    let mut imports = vec![];
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "import_declaration" {
            imports.push(child);
        }
    }
    imports
}

/// The top-level package declaration, if any.
pub(crate) fn package_declaration(root: Node) -> Option<Node> {
    let mut cursor = root.walk();
    root.children(&mut cursor)
        .find(|child| child.kind() == "package_declaration")
}

/// The declared package name, or `None` for the default package.
pub(crate) fn package_name<'a>(root: Node, source: &'a str) -> Option<&'a str> {
    let package = package_declaration(root)?;
    let mut cursor = package.walk();
    package
        .children(&mut cursor)
        .find(|child| matches!(child.kind(), "scoped_identifier" | "identifier"))
        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
}

/// All comment nodes in the tree, in position order.
pub(crate) fn comment_nodes(root: Node) -> Vec<Node> {
    let mut comments = vec![];
    collect_comments(root, &mut comments);
    comments
}

fn collect_comments<'a>(node: Node<'a>, comments: &mut Vec<Node<'a>>) {
    if matches!(node.kind(), "line_comment" | "block_comment") {
        comments.push(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_comments(child, comments);
    }
}

/// Extract the static flag and dotted path from an import declaration.
fn parse_import_declaration(node: Node, source: &str) -> Option<(bool, String)> {
    let mut is_static = false;
    let mut is_wildcard = false;
    let mut path_parts = vec![];

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "static" => is_static = true,
            "asterisk" => is_wildcard = true,
            "identifier" | "scoped_identifier" => {
                path_parts.push(child.utf8_text(source.as_bytes()).ok()?);
            }
            _ => {}
        }
    }

    if path_parts.is_empty() {
        return None;
    }

    let mut path = path_parts.join(".");
    if is_wildcard {
        path.push_str(".*");
    }
    Some((is_static, path))
}

fn node_text(node: Node, source: &str) -> String {
    node.utf8_text(source.as_bytes()).unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortal_java_parser::JavaParser;

    fn locate_source(source: &str) -> Section {
        let lines: Vec<String> = source.split('\n').map(String::from).collect();
        let mut parser = JavaParser::new();
        let result = parser.parse(source).unwrap();
        locate(result.tree.root_node(), source, &lines, "\n")
    }

    #[test]
    fn test_no_imports_spans_whole_file() {
        let source = "package p;\n\nclass Test {}\n";
        let section = locate_source(source);
        assert_eq!(section.start, 0);
        assert_eq!(section.stop, 4);
        assert!(section.original.is_empty());
        assert!(section.imports.is_empty());
    }

    #[test]
    fn test_locates_range_with_blank_padding() {
        let source = "package p;\n\nimport a.B;\nimport c.D;\n\nclass Test {}\n";
        let section = locate_source(source);
        assert_eq!(section.start, 1);
        assert_eq!(section.stop, 5);
        assert_eq!(section.original, "\nimport a.B;\nimport c.D;\n\n");
        assert_eq!(section.imports.len(), 2);
    }

    #[test]
    fn test_floating_comment_becomes_prefix() {
        let source = "package p;\n\n// utility types\nimport a.B;\n\nclass Test {}\n";
        let section = locate_source(source);
        let imports: Vec<&Import> = section.imports.iter().collect();
        assert_eq!(imports[0].prefix(), "// utility types");
    }

    #[test]
    fn test_trailing_comment_becomes_suffix() {
        let source = "package p;\n\nimport a.B; // why\n\nclass Test {}\n";
        let section = locate_source(source);
        let imports: Vec<&Import> = section.imports.iter().collect();
        assert_eq!(imports[0].suffix(), " // why");
        assert_eq!(imports[0].render("\n"), "import a.B; // why");
    }

    #[test]
    fn test_trailing_comment_on_last_import_in_range() {
        let source = "package p;\n\nimport a.B;\nimport c.D; // last\n\nclass Test {}\n";
        let section = locate_source(source);
        assert_eq!(section.stop, 5);
        let imports: Vec<&Import> = section.imports.iter().collect();
        assert_eq!(imports[1].suffix(), " // last");
    }

    #[test]
    fn test_trailing_block_comment_spanning_lines_stays_in_range() {
        let source = "package p;\n\nimport b.B;\nimport a.A; /* x\ny */\n\nclass T {}\n";
        let section = locate_source(source);
        // the comment's second line belongs to the section
        assert_eq!(section.stop, 6);
        assert_eq!(section.original, "\nimport b.B;\nimport a.A; /* x\ny */\n\n");
        let imports: Vec<&Import> = section.imports.iter().collect();
        assert_eq!(imports[1].suffix(), " /* x\ny */");
    }

    #[test]
    fn test_comment_between_imports() {
        let source = "package p;\n\nimport a.B;\n// group two\nimport c.D;\n\nclass T {}\n";
        let section = locate_source(source);
        let imports: Vec<&Import> = section.imports.iter().collect();
        assert_eq!(imports[0].prefix(), "");
        assert_eq!(imports[1].prefix(), "// group two");
    }

    #[test]
    fn test_duplicate_imports_merge_comments() {
        let source = "package p;\n\n// first\nimport a.B;\n// second\nimport a.B;\n\nclass T {}\n";
        let section = locate_source(source);
        assert_eq!(section.imports.len(), 1);
        let imports: Vec<&Import> = section.imports.iter().collect();
        assert_eq!(imports[0].prefix(), "// first\n// second");
    }

    #[test]
    fn test_header_comment_stays_outside_section() {
        let source = "// Copyright\n\nimport a.B;\n\nclass T {}\n";
        let section = locate_source(source);
        assert_eq!(section.start, 1);
        let imports: Vec<&Import> = section.imports.iter().collect();
        assert_eq!(imports[0].prefix(), "");
    }

    #[test]
    fn test_adjacent_comment_attaches_without_package() {
        let source = "// belongs to import\nimport a.B;\n\nclass T {}\n";
        let section = locate_source(source);
        let imports: Vec<&Import> = section.imports.iter().collect();
        assert_eq!(imports[0].prefix(), "// belongs to import");
    }

    #[test]
    fn test_package_trailing_comment_not_claimed() {
        let source = "package p; // the package\n\nimport a.B;\n\nclass T {}\n";
        let section = locate_source(source);
        let imports: Vec<&Import> = section.imports.iter().collect();
        assert_eq!(imports[0].prefix(), "");
    }

    #[test]
    fn test_static_and_wildcard_imports() {
        let source =
            "package p;\n\nimport static x.Y.max;\nimport java.util.*;\n\nclass T {}\n";
        let section = locate_source(source);
        let imports: Vec<&Import> = section.imports.iter().collect();
        assert!(imports[0].is_static());
        assert_eq!(imports[0].path(), "x.Y.max");
        assert!(!imports[1].is_static());
        assert_eq!(imports[1].path(), "java.util.*");
    }

    #[test]
    fn test_package_name() {
        let source = "package com.example.app;\n\nclass T {}\n";
        let mut parser = JavaParser::new();
        let result = parser.parse(source).unwrap();
        assert_eq!(
            package_name(result.tree.root_node(), source),
            Some("com.example.app")
        );

        let source = "class T {}\n";
        let result = parser.parse(source).unwrap();
        assert_eq!(package_name(result.tree.root_node(), source), None);
    }
}
