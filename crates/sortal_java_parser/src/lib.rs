//! Java parsing for sortal, wrapping tree-sitter.
//!
//! Provides the parser handle used by the engine, collection of parse
//! problems (tree-sitter `ERROR`/missing nodes), and a Javadoc parser for
//! doc comments.

pub mod javadoc;

use tree_sitter::{Node, Tree};

/// Java source compliance level, parsed from a Maven-style compliance
/// string (e.g. "1.8", "8", "11", "17").
///
/// The tree-sitter grammar accepts sources of any level, so this is carried
/// as configuration passthrough only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageLevel(String);

impl LanguageLevel {
    /// Parse a compliance string. Blank or missing input yields the
    /// "popular" default, mirroring common build-tool behavior.
    pub fn from_compliance(compliance: Option<&str>) -> Self {
        let v = compliance.map(str::trim).unwrap_or("");
        if v.is_empty() {
            return Self("popular".to_string());
        }
        // "1.5".."1.9" are aliases for "5".."9"
        let normalized = v.strip_prefix("1.").filter(|rest| {
            rest.len() == 1 && rest.chars().all(|c| c.is_ascii_digit()) && *rest >= "5"
        });
        Self(normalized.unwrap_or(v).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageLevel {
    fn default() -> Self {
        Self::from_compliance(None)
    }
}

/// A parse problem reported by the grammar, at a 0-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Problem {
    pub row: usize,
    pub column: usize,
}

/// Result of parsing a Java source file.
pub struct ParseResult {
    pub tree: Tree,
}

/// A reusable Java parser.
pub struct JavaParser {
    parser: tree_sitter::Parser,
    language_level: LanguageLevel,
}

impl JavaParser {
    pub fn new() -> Self {
        Self::with_language_level(LanguageLevel::default())
    }

    pub fn with_language_level(language_level: LanguageLevel) -> Self {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .expect("Java grammar incompatible with tree-sitter runtime");
        Self {
            parser,
            language_level,
        }
    }

    pub fn language_level(&self) -> &LanguageLevel {
        &self.language_level
    }

    /// Parse Java source text. Returns `None` only if the parser produced
    /// no tree at all; recoverable syntax errors still yield a tree and are
    /// reported through [`collect_problems`].
    pub fn parse(&mut self, source: &str) -> Option<ParseResult> {
        self.parser
            .parse(source, None)
            .map(|tree| ParseResult { tree })
    }
}

impl Default for JavaParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect the positions of all `ERROR` and missing nodes under `root`.
pub fn collect_problems(root: Node) -> Vec<Problem> {
    let mut problems = vec![];
    if root.has_error() {
        collect_problems_recursive(root, &mut problems);
    }
    problems
}

fn collect_problems_recursive(node: Node, problems: &mut Vec<Problem>) {
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        problems.push(Problem {
            row: pos.row,
            column: pos.column,
        });
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        // Subtrees without errors have nothing to report
        if child.has_error() {
            collect_problems_recursive(child, problems);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_source() {
        let source = "package p;\n\nimport java.util.List;\n\nclass Test {}\n";
        let mut parser = JavaParser::new();
        let result = parser.parse(source).unwrap();
        assert_eq!(result.tree.root_node().kind(), "program");
        assert!(collect_problems(result.tree.root_node()).is_empty());
    }

    #[test]
    fn test_collect_problems_positions() {
        let source = "class Test {\n    void broken( {\n}\n";
        let mut parser = JavaParser::new();
        let result = parser.parse(source).unwrap();
        let problems = collect_problems(result.tree.root_node());
        assert!(!problems.is_empty());
        assert!(problems.iter().all(|p| p.row <= 2));
    }

    #[test]
    fn test_language_level_from_compliance() {
        assert_eq!(LanguageLevel::from_compliance(None).as_str(), "popular");
        assert_eq!(LanguageLevel::from_compliance(Some("  ")).as_str(), "popular");
        assert_eq!(LanguageLevel::from_compliance(Some("1.8")).as_str(), "8");
        assert_eq!(LanguageLevel::from_compliance(Some("1.4")).as_str(), "1.4");
        assert_eq!(LanguageLevel::from_compliance(Some("17")).as_str(), "17");
    }
}
