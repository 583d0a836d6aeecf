//! Unused-import detection.
//!
//! Purely textual: an import is unused when the last segment of its path
//! appears nowhere among the identifier-like tokens of the file's code and
//! Javadoc. Wildcard imports are never removed.

use std::collections::HashSet;

use sortal_java_parser::javadoc::{self, JavadocElement};
use tree_sitter::Node;

use crate::import::{Import, ImportSet};
use crate::section::{comment_nodes, package_declaration};

/// Top-level declarations whose token ranges are scanned.
const TYPE_DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

/// Remove imports whose last path segment is referenced nowhere.
pub(crate) fn remove_unused_imports(imports: &mut ImportSet, tokens_in_use: &HashSet<String>) {
    imports.retain(|imp| {
        let last_segment = imp
            .path()
            .rsplit('.')
            .next()
            .expect("rsplit yields at least one segment");
        assert!(!last_segment.is_empty(), "import with empty path segment: {}", imp.path());
        last_segment == "*" || tokens_in_use.contains(last_segment)
    });
}

/// Remove imports declared in the file's own package. For the default
/// package (`None`), that is any import without a dot; otherwise any path
/// that extends the package name by exactly one segment.
pub(crate) fn remove_same_package_imports(imports: &mut ImportSet, package: Option<&str>) {
    imports.retain(|imp| !is_same_package(imp, package));
}

fn is_same_package(imp: &Import, package: Option<&str>) -> bool {
    let path = imp.path();
    match package {
        None | Some("") => !path.contains('.'),
        Some(pkg) => {
            path.starts_with(pkg) && path.rfind('.').is_none_or(|dot| dot <= pkg.len())
        }
    }
}

/// The set of identifier-like tokens referenced by the file: tokens from
/// package-level annotations, all leaf tokens of top-level type
/// declarations, and identifiers extracted from Javadoc.
pub(crate) fn tokens_in_use(root: Node, source: &str) -> HashSet<String> {
    let mut tokens = HashSet::new();

    if let Some(package) = package_declaration(root) {
        let mut cursor = package.walk();
        for child in package.children(&mut cursor) {
            if matches!(child.kind(), "annotation" | "marker_annotation") {
                collect_leaf_tokens(child, source, &mut tokens);
            }
        }
    }

    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if TYPE_DECLARATION_KINDS.contains(&child.kind()) {
            collect_leaf_tokens(child, source, &mut tokens);
        }
    }

    for comment in comment_nodes(root) {
        let text = comment.utf8_text(source.as_bytes()).unwrap_or("");
        if javadoc::is_javadoc(text) {
            javadoc_tokens(text, &mut tokens);
        }
    }

    tokens
}

/// Collect every leaf token under `node` whose first character could start
/// a Java identifier. Comments and literals filter themselves out by their
/// leading `/`, quote, or digit.
fn collect_leaf_tokens(node: Node, source: &str, tokens: &mut HashSet<String>) {
    if node.child_count() == 0 {
        let text = node.utf8_text(source.as_bytes()).unwrap_or("");
        if starts_like_identifier(text) {
            tokens.insert(text.to_string());
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_leaf_tokens(child, source, tokens);
    }
}

/// Identifiers referenced from one Javadoc comment: snippet text and
/// inline-tag content split on non-word characters, plus the names of
/// `@throws`/`@exception` tags (other tag names, e.g. a `@param` name, are
/// not importable identifiers).
fn javadoc_tokens(comment_text: &str, tokens: &mut HashSet<String>) {
    let doc = javadoc::parse(comment_text);

    let mut push_elements = |elements: &[JavadocElement], tokens: &mut HashSet<String>| {
        for element in elements {
            let text = match element {
                JavadocElement::Snippet(s) => s,
                JavadocElement::InlineTag { content, .. } => content,
            };
            for word in text.split(|c: char| !(c.is_alphanumeric() || c == '_')) {
                if starts_like_identifier(word) {
                    tokens.insert(word.to_string());
                }
            }
        }
    };

    push_elements(&doc.description, tokens);
    for tag in &doc.block_tags {
        push_elements(&tag.content, tokens);
        if matches!(tag.tag.as_str(), "throws" | "exception") {
            if let Some(name) = &tag.name {
                if starts_like_identifier(name) {
                    tokens.insert(name.clone());
                }
            }
        }
    }
}

/// Whether `text` is non-empty and begins with a valid Java identifier
/// start character.
fn starts_like_identifier(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortal_java_parser::JavaParser;

    fn tokens_for(source: &str) -> HashSet<String> {
        let mut parser = JavaParser::new();
        let result = parser.parse(source).unwrap();
        tokens_in_use(result.tree.root_node(), source)
    }

    fn import_set(paths: &[(&str, bool)]) -> ImportSet {
        paths
            .iter()
            .map(|(p, s)| Import::new(*s, *p, "", ""))
            .collect()
    }

    fn paths(imports: &ImportSet) -> Vec<String> {
        imports.iter().map(|i| i.path().to_string()).collect()
    }

    #[test]
    fn test_tokens_from_code() {
        let source = "package p;\n\nclass Test {\n    Map<String, List> m;\n}\n";
        let tokens = tokens_for(source);
        assert!(tokens.contains("Map"));
        assert!(tokens.contains("List"));
        assert!(tokens.contains("String"));
        assert!(!tokens.contains("Foo"));
    }

    #[test]
    fn test_comments_inside_code_do_not_count() {
        let source = "class Test {\n    // Mentions Foo but only in a comment\n    int x;\n}\n";
        assert!(!tokens_for(source).contains("Foo"));
    }

    #[test]
    fn test_javadoc_see_counts() {
        let source = "class Test {\n    /**\n     * @see Foo\n     */\n    void m() {}\n}\n";
        assert!(tokens_for(source).contains("Foo"));
    }

    #[test]
    fn test_javadoc_throws_name_counts() {
        let source =
            "class Test {\n    /**\n     * @throws SomeExc always\n     */\n    void m() {}\n}\n";
        assert!(tokens_for(source).contains("SomeExc"));
    }

    #[test]
    fn test_javadoc_inline_tag_content_is_split() {
        let source = "class Test {\n    /** {@link Type2#method(Type3, Type4)} */\n    void m() {}\n}\n";
        let tokens = tokens_for(source);
        assert!(tokens.contains("Type2"));
        assert!(tokens.contains("Type3"));
        assert!(tokens.contains("Type4"));
    }

    #[test]
    fn test_param_name_does_not_count() {
        let mut tokens = HashSet::new();
        javadoc_tokens("/** @param Bogus the value */", &mut tokens);
        assert!(!tokens.contains("Bogus"));
        assert!(tokens.contains("the"));
    }

    #[test]
    fn test_package_annotation_tokens() {
        let source = "@Generated(\"tool\")\npackage p;\n";
        assert!(tokens_for(source).contains("Generated"));
    }

    #[test]
    fn test_remove_unused_keeps_wildcards() {
        let mut imports = import_set(&[("java.util.*", false), ("x.Unused", false)]);
        remove_unused_imports(&mut imports, &HashSet::new());
        assert_eq!(paths(&imports), vec!["java.util.*"]);
    }

    #[test]
    fn test_remove_unused_by_last_segment() {
        let mut imports = import_set(&[("x.Foo", false), ("x.Bar", false)]);
        let tokens: HashSet<String> = ["Foo".to_string()].into();
        remove_unused_imports(&mut imports, &tokens);
        assert_eq!(paths(&imports), vec!["x.Foo"]);
    }

    #[test]
    fn test_same_package_filter() {
        let mut imports = import_set(&[
            ("abc.Blah", false),
            ("abcd.ef.Blah2", false),
            ("abcd.ef.Blah.Blah", false),
            ("abcd.efg.Blah2", false),
        ]);
        remove_same_package_imports(&mut imports, Some("abcd.ef"));
        assert_eq!(
            paths(&imports),
            vec!["abc.Blah", "abcd.ef.Blah.Blah", "abcd.efg.Blah2"]
        );
    }

    #[test]
    fn test_same_package_filter_no_package() {
        let mut imports = import_set(&[("Blah", false), ("abc.Blah", false)]);
        remove_same_package_imports(&mut imports, None);
        assert_eq!(paths(&imports), vec!["abc.Blah"]);
    }

    #[test]
    fn test_same_package_filter_none_matches() {
        let mut imports = import_set(&[
            ("abc.Blah", false),
            ("abcd.ef.Blah2", false),
            ("abcd.ef.Blah.Blah", false),
            ("abcd.efg.Blah2", false),
        ]);
        remove_same_package_imports(&mut imports, None);
        assert_eq!(imports.len(), 4);
    }
}
