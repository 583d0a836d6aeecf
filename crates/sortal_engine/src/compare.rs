//! Orderings over imports within a group bucket.

use std::cmp::Ordering;

use crate::import::Import;

/// Lexicographic (codepoint) order on the dotted path.
pub fn depth_first(a: &Import, b: &Import) -> Ordering {
    a.path().cmp(b.path())
}

/// Paths with fewer dotted segments sort first; ties fall back to
/// lexicographic path order. This groups all members of a class before
/// any members of its nested classes.
pub fn breadth_first(a: &Import, b: &Import) -> Ordering {
    let a_depth = a.path().split('.').count();
    let b_depth = b.path().split('.').count();
    a_depth.cmp(&b_depth).then_with(|| a.path().cmp(b.path()))
}
