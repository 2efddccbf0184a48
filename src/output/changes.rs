//! Differences between two polls

use crate::resource::ResourceRecord;
use std::collections::HashSet;

/// Resource names that appeared or disappeared between two polls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordChanges {
    /// Names present now but not before, in current order
    pub added: Vec<String>,

    /// Names present before but not now, in previous order
    pub removed: Vec<String>,
}

impl RecordChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compares two record lists by resource name
///
/// Records without a name cannot be matched across polls and are ignored.
/// Each name is reported once even if it occurs several times.
pub fn diff_records(previous: &[ResourceRecord], current: &[ResourceRecord]) -> RecordChanges {
    let before = names(previous);
    let after = names(current);

    RecordChanges {
        added: ordered_difference(current, &before),
        removed: ordered_difference(previous, &after),
    }
}

fn names(records: &[ResourceRecord]) -> HashSet<&str> {
    records
        .iter()
        .map(|r| r.name.as_str())
        .filter(|n| !n.is_empty())
        .collect()
}

fn ordered_difference(records: &[ResourceRecord], other: &HashSet<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| r.name.as_str())
        .filter(|n| !n.is_empty() && !other.contains(n) && seen.insert(*n))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<ResourceRecord> {
        names
            .iter()
            .map(|n| ResourceRecord {
                name: n.to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_diff_records() {
        let changes = diff_records(
            &named(&["Aszolite", "Gorsite", "Bicorium"]),
            &named(&["Zeddite", "Aszolite", "Bicorium", "Quarfinite"]),
        );

        assert_eq!(changes.added, vec!["Zeddite", "Quarfinite"]);
        assert_eq!(changes.removed, vec!["Gorsite"]);
    }

    #[test]
    fn test_identical_lists_have_no_changes() {
        let records = named(&["Aszolite", "Gorsite"]);
        assert!(diff_records(&records, &records).is_empty());
    }

    #[test]
    fn test_blank_and_duplicate_names() {
        let changes = diff_records(&[], &named(&["", "Aszolite", "Aszolite"]));
        assert_eq!(changes.added, vec!["Aszolite"]);
        assert!(changes.removed.is_empty());
    }
}
