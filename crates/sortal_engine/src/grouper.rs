//! Partitioning imports into groups and emitting the canonical section.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::compare;
use crate::group::{Group, GroupError, parse_groups};
use crate::import::{Import, ImportSet};

/// Assigns imports to user-defined groups and emits the sorted section.
#[derive(Debug)]
pub struct Grouper {
    groups: Vec<Group>,
    static_groups: Vec<Group>,
    static_after: bool,
    join_static_with_non_static: bool,
    breadth_first: bool,
}

impl Grouper {
    /// Build a grouper from the two comma-separated group specs and the
    /// emission flags. Fails on an invalid or duplicate group prefix.
    pub fn new(
        groups: &str,
        static_groups: &str,
        static_after: bool,
        join_static_with_non_static: bool,
        breadth_first: bool,
    ) -> Result<Self, GroupError> {
        Ok(Self {
            groups: parse_groups(groups)?,
            static_groups: parse_groups(static_groups)?,
            static_after,
            join_static_with_non_static,
            breadth_first,
        })
    }

    pub fn static_after(&self) -> bool {
        self.static_after
    }

    pub fn join_static_with_non_static(&self) -> bool {
        self.join_static_with_non_static
    }

    /// The canonical section text for `imports`, using `eol` between every
    /// emitted line (including after the last one).
    pub fn grouped_imports(&self, imports: &ImportSet, eol: &str) -> String {
        let statics = self.bucket(imports, &self.static_groups, true);
        let non_statics = self.bucket(imports, &self.groups, false);

        let (first, second) = if self.static_after {
            (&non_statics, &statics)
        } else {
            (&statics, &non_statics)
        };

        let mut out = String::new();
        emit_partition(&mut out, first, eol);
        if !self.join_static_with_non_static && !first.is_empty() && !second.is_empty() {
            out.push_str(eol);
        }
        emit_partition(&mut out, second, eol);
        out
    }

    /// Assign each import in the partition to the first matching group,
    /// keyed by the group's user-facing order, and sort within buckets.
    fn bucket<'a>(
        &self,
        imports: &'a ImportSet,
        groups: &[Group],
        is_static: bool,
    ) -> BTreeMap<usize, Vec<&'a Import>> {
        let comparator: fn(&Import, &Import) -> Ordering = if self.breadth_first {
            compare::breadth_first
        } else {
            compare::depth_first
        };

        let mut buckets: BTreeMap<usize, Vec<&Import>> = BTreeMap::new();
        for imp in imports.iter().filter(|i| i.is_static() == is_static) {
            // Groups are pre-sorted longest prefix first, so the first
            // match is the most specific; the `*` group matches anything
            if let Some(group) = groups.iter().find(|g| g.matches(imp.path())) {
                buckets.entry(group.order()).or_default().push(imp);
            }
        }
        for bucket in buckets.values_mut() {
            bucket.sort_by(|a, b| comparator(a, b));
        }
        buckets
    }
}

/// Emit the partition's buckets in ascending order, one blank line between
/// buckets.
fn emit_partition(out: &mut String, buckets: &BTreeMap<usize, Vec<&Import>>, eol: &str) {
    let mut first_bucket = true;
    for bucket in buckets.values() {
        if !first_bucket {
            out.push_str(eol);
        }
        first_bucket = false;
        for imp in bucket {
            out.push_str(&imp.render(eol));
            out.push_str(eol);
        }
    }
}
