//! Dumps the nodes sortal cares about from a Java file: the package
//! declaration, import declarations, comments, and parse problems.
//!
//! Usage:
//!   cat MyClass.java | cargo run --bin dump_import_nodes
//!   cargo run --bin dump_import_nodes < MyClass.java

use sortal_java_parser::{JavaParser, collect_problems};
use std::io::{self, Read};

fn main() {
    let mut source = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut source) {
        eprintln!("Error reading stdin: {}", e);
        std::process::exit(1);
    }

    if source.trim().is_empty() {
        eprintln!("Error: No input provided. Pipe a Java file to stdin.");
        eprintln!("Usage: cat MyClass.java | dump_import_nodes");
        std::process::exit(1);
    }

    let mut parser = JavaParser::new();
    let Some(result) = parser.parse(&source) else {
        eprintln!("Error: Failed to parse Java source");
        std::process::exit(1);
    };

    let root = result.tree.root_node();
    dump_node(root, &source);

    for problem in collect_problems(root) {
        println!(
            "problem [{}:{}]",
            problem.row + 1,
            problem.column
        );
    }
}

fn dump_node(node: tree_sitter::Node, source: &str) {
    match node.kind() {
        "package_declaration" | "import_declaration" | "line_comment" | "block_comment" => {
            let start = node.start_position();
            let end = node.end_position();
            let text: String = node
                .utf8_text(source.as_bytes())
                .unwrap_or("")
                .chars()
                .take(60)
                .map(|c| if c == '\n' { '\u{21b5}' } else { c })
                .collect();
            println!(
                "{} [{}:{}-{}:{}] \"{}\"",
                node.kind(),
                start.row + 1,
                start.column,
                end.row + 1,
                end.column,
                text
            );
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        dump_node(child, source);
    }
}
