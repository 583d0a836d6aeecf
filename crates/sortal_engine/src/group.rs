//! Group specs: parsing the comma-separated prefix list into the ordered
//! match list used by the grouper.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    /// A group is a dotted identifier path (optionally dot-terminated) or
    /// the `*` wildcard.
    static ref VALID_GROUP: Regex = Regex::new(r"^(?:\w+(?:\.\w+)*\.?|\*)$").unwrap();
}

/// An invalid group spec, raised at grouper construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GroupError {
    #[error("Invalid group ({group}) in ({spec})")]
    InvalidGroup { group: String, spec: String },

    #[error("Duplicate group ({group}) in ({spec})")]
    DuplicateGroup { group: String, spec: String },
}

/// A prefix match rule selecting which bucket an import lands in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    prefix: String,
    order: usize,
}

impl Group {
    pub(crate) fn new(prefix: impl Into<String>, order: usize) -> Self {
        Self {
            prefix: prefix.into(),
            order,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Zero-based position the user wrote this group in; buckets are
    /// emitted in this order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Whether an import path belongs to this group. The `*` wildcard
    /// matches everything.
    pub fn matches(&self, import_path: &str) -> bool {
        self.prefix == "*" || import_path.starts_with(&self.prefix)
    }
}

/// Parse a comma-separated group spec into the match list, ordered by
/// descending prefix length so longer prefixes match first (ties keep
/// encounter order). A `*` group is appended at the lowest precedence if
/// the spec has none.
pub fn parse_groups(spec: &str) -> Result<Vec<Group>, GroupError> {
    let mut parsed: Vec<Group> = vec![];
    let stripped: String = spec.chars().filter(|c| !c.is_whitespace()).collect();

    // An empty spec means zero user-supplied groups
    if !stripped.is_empty() {
        for token in stripped.split(',') {
            if !VALID_GROUP.is_match(token) {
                return Err(GroupError::InvalidGroup {
                    group: token.to_string(),
                    spec: spec.to_string(),
                });
            }
            if parsed.iter().any(|g| g.prefix == token) {
                return Err(GroupError::DuplicateGroup {
                    group: token.to_string(),
                    spec: spec.to_string(),
                });
            }
            let order = parsed.len();
            parsed.push(Group::new(token, order));
        }
    }

    if !parsed.iter().any(|g| g.prefix == "*") {
        let order = parsed.len();
        parsed.push(Group::new("*", order));
    }

    // Longest prefix first; sort stability preserves encounter order on ties
    parsed.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
    Ok(parsed)
}
