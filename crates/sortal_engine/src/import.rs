//! The canonical record for one import declaration, and the ordered set
//! that merges duplicates as they are inserted.

use indexmap::IndexMap;

/// A single `import` or `import static` declaration with its attached
/// comments. Prefix comments are stored newline-separated; the suffix is
/// the trailing same-line comment, prefixed with one space when non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Import {
    is_static: bool,
    path: String,
    prefix: String,
    suffix: String,
}

impl Import {
    pub fn new(
        is_static: bool,
        path: impl Into<String>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            is_static,
            path: path.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// The dotted import path; may end with `.*`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Whether `other` declares the same import, regardless of comments.
    pub fn is_duplicated_by(&self, other: &Import) -> bool {
        self.is_static == other.is_static && self.path == other.path
    }

    /// Merge a duplicate into this import: non-empty prefixes are joined
    /// with a newline, suffixes concatenate verbatim.
    pub fn combine_with(&self, duplicate: &Import) -> Import {
        let prefix = match (self.prefix.is_empty(), duplicate.prefix.is_empty()) {
            (false, false) => format!("{}\n{}", self.prefix, duplicate.prefix),
            (false, true) => self.prefix.clone(),
            (true, _) => duplicate.prefix.clone(),
        };
        Import {
            is_static: self.is_static,
            path: self.path.clone(),
            prefix,
            suffix: format!("{}{}", self.suffix, duplicate.suffix),
        }
    }

    /// The declaration text, using `eol` for any embedded line breaks.
    pub fn render(&self, eol: &str) -> String {
        let mut out = String::new();
        if !self.prefix.is_empty() {
            if eol == "\n" {
                out.push_str(&self.prefix);
            } else {
                out.push_str(&self.prefix.replace('\n', eol));
            }
            out.push_str(eol);
        }
        out.push_str("import");
        if self.is_static {
            out.push_str(" static");
        }
        out.push(' ');
        out.push_str(&self.path);
        out.push(';');
        if eol == "\n" {
            out.push_str(&self.suffix);
        } else {
            out.push_str(&self.suffix.replace('\n', eol));
        }
        out
    }
}

/// Insertion-ordered set of imports, unique by `(static, path)`.
///
/// Inserting a duplicate removes the existing entry and appends the merged
/// import at the end, so later occurrences win on position.
#[derive(Debug, Default)]
pub struct ImportSet {
    map: IndexMap<(bool, String), Import>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, import: Import) {
        let key = (import.is_static, import.path.clone());
        let merged = match self.map.shift_remove(&key) {
            Some(existing) => existing.combine_with(&import),
            None => import,
        };
        self.map.insert(key, merged);
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&Import) -> bool) {
        self.map.retain(|_, imp| keep(imp));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Import> {
        self.map.values()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn into_vec(self) -> Vec<Import> {
        self.map.into_values().collect()
    }
}

impl FromIterator<Import> for ImportSet {
    fn from_iter<T: IntoIterator<Item = Import>>(iter: T) -> Self {
        let mut set = ImportSet::new();
        for imp in iter {
            set.add(imp);
        }
        set
    }
}
