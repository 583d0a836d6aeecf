//! Javadoc comment parsing.
//!
//! Splits a `/** ... */` comment into a description and block tags, and
//! splits description text into plain snippets and `{@tag ...}` inline tags.
//! Only the structure needed to extract referenced identifiers is modeled.

/// One element of Javadoc description text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JavadocElement {
    /// Plain text between inline tags.
    Snippet(String),
    /// An inline tag such as `{@link Foo}` or `{@value Bar#field}`.
    InlineTag { name: String, content: String },
}

/// A block tag such as `@param x the x` or `@throws IOException when ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTag {
    /// Tag identifier without the leading `@`, e.g. "throws".
    pub tag: String,
    /// First word after the tag, for tags that name something
    /// (`@param`, `@throws`, `@exception`).
    pub name: Option<String>,
    /// Remaining tag text, parsed like description text.
    pub content: Vec<JavadocElement>,
}

/// A parsed Javadoc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Javadoc {
    pub description: Vec<JavadocElement>,
    pub block_tags: Vec<BlockTag>,
}

/// Tags whose first word is a name rather than free text.
const NAMED_TAGS: &[&str] = &["param", "throws", "exception"];

/// Whether a comment's raw text is a Javadoc comment.
pub fn is_javadoc(text: &str) -> bool {
    text.starts_with("/**") && text.len() > 4
}

/// Parse the raw text of a `/** ... */` comment.
pub fn parse(comment: &str) -> Javadoc {
    let body = comment.strip_prefix("/**").unwrap_or(comment);
    let body = body.strip_suffix("*/").unwrap_or(body);

    // Strip the decorative leading asterisks line by line
    let lines: Vec<&str> = body.lines().map(strip_line_decoration).collect();

    // The description runs until the first block-tag line
    let tag_start = lines
        .iter()
        .position(|l| l.trim_start().starts_with('@'))
        .unwrap_or(lines.len());

    let description_text = lines[..tag_start].join("\n");
    let description = parse_elements(description_text.trim());

    let mut block_tags = vec![];
    let mut current: Option<Vec<&str>> = None;
    for line in &lines[tag_start..] {
        if line.trim_start().starts_with('@') {
            if let Some(tag_lines) = current.take() {
                block_tags.push(parse_block_tag(&tag_lines.join("\n")));
            }
            current = Some(vec![line.trim_start()]);
        } else if let Some(tag_lines) = &mut current {
            // Continuation line of the current tag
            tag_lines.push(line);
        }
    }
    if let Some(tag_lines) = current {
        block_tags.push(parse_block_tag(&tag_lines.join("\n")));
    }

    Javadoc {
        description,
        block_tags,
    }
}

/// Remove leading whitespace and the `*` margin from a Javadoc line.
fn strip_line_decoration(line: &str) -> &str {
    let trimmed = line.trim_start();
    let stripped = trimmed.trim_start_matches('*');
    stripped.strip_prefix(' ').unwrap_or(stripped)
}

fn parse_block_tag(text: &str) -> BlockTag {
    let rest = text.trim_start().strip_prefix('@').unwrap_or(text);
    let mut words = rest.splitn(2, char::is_whitespace);
    let tag = words.next().unwrap_or("").to_string();
    let after_tag = words.next().unwrap_or("").trim_start();

    let (name, content_text) = if NAMED_TAGS.contains(&tag.as_str()) {
        let mut parts = after_tag.splitn(2, char::is_whitespace);
        let name = parts.next().filter(|n| !n.is_empty()).map(String::from);
        (name, parts.next().unwrap_or("").to_string())
    } else {
        (None, after_tag.to_string())
    };

    BlockTag {
        tag,
        name,
        content: parse_elements(content_text.trim()),
    }
}

/// Split text into snippets and `{@tag content}` inline tags.
fn parse_elements(text: &str) -> Vec<JavadocElement> {
    let mut elements = vec![];
    let mut rest = text;
    while let Some(open) = rest.find("{@") {
        let Some(close) = matching_brace(&rest[open..]) else {
            // Unterminated inline tag, keep the remainder as plain text
            break;
        };
        if open > 0 {
            push_snippet(&mut elements, &rest[..open]);
        }
        let inner = &rest[open + 2..open + close];
        let mut words = inner.splitn(2, char::is_whitespace);
        let name = words.next().unwrap_or("").to_string();
        let content = words.next().unwrap_or("").trim().to_string();
        elements.push(JavadocElement::InlineTag { name, content });
        rest = &rest[open + close + 1..];
    }
    push_snippet(&mut elements, rest);
    elements
}

/// Offset of the `}` closing the `{` at the start of `s`, counting nesting.
fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn push_snippet(elements: &mut Vec<JavadocElement>, text: &str) {
    if !text.trim().is_empty() {
        elements.push(JavadocElement::Snippet(text.to_string()));
    }
}
