//! Sort orders for the resource list
//!
//! The site sorts server-side through its own parameter names; this module
//! keeps the one table mapping those to the names used everywhere else, plus
//! a client-side re-sort over already fetched records.

use crate::resource::ResourceRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Sort order for the resource list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Alphabetical by resource name
    ByName,

    /// Grouped by resource category
    ByCategory,

    /// Most recently uploaded first
    #[default]
    ByUploadTime,
}

/// (key, client name, upstream parameter)
const SORT_TABLE: [(SortKey, &str, &str); 3] = [
    (SortKey::ByName, "by-name", "resName"),
    (SortKey::ByCategory, "by-category", "resType"),
    (SortKey::ByUploadTime, "by-upload-time", "timeEntered"),
];

impl SortKey {
    /// All sort keys, in table order
    pub fn all() -> [SortKey; 3] {
        SORT_TABLE.map(|(key, _, _)| key)
    }

    /// Name used in configuration and on the command line
    pub fn client_name(self) -> &'static str {
        SORT_TABLE[self.row()].1
    }

    /// Value of the site's `sort` form parameter
    pub fn upstream_param(self) -> &'static str {
        SORT_TABLE[self.row()].2
    }

    /// Position of this key's row in `SORT_TABLE`
    const fn row(self) -> usize {
        match self {
            SortKey::ByName => 0,
            SortKey::ByCategory => 1,
            SortKey::ByUploadTime => 2,
        }
    }

    pub fn from_client_name(name: &str) -> Option<Self> {
        SORT_TABLE
            .iter()
            .find(|(_, client, _)| *client == name)
            .map(|(key, _, _)| *key)
    }

    pub fn from_upstream_param(param: &str) -> Option<Self> {
        SORT_TABLE
            .iter()
            .find(|(_, _, upstream)| *upstream == param)
            .map(|(key, _, _)| *key)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.client_name())
    }
}

impl FromStr for SortKey {
    type Err = String;

    /// Accepts either a client name or an upstream parameter name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::from_client_name(s)
            .or_else(|| Self::from_upstream_param(s))
            .ok_or_else(|| {
                format!(
                    "unknown sort key '{}', expected one of: {}",
                    s,
                    SORT_TABLE
                        .iter()
                        .map(|(_, client, _)| *client)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

static AGE_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*([A-Za-z]+)").expect("age pattern is valid"));

/// Converts relative time text such as `"2h ago"` or `"3 days ago"` into seconds
///
/// Every `<number><unit>` pair in the text is summed, so `"1d 4h ago"` works
/// too. Unknown units are ignored.
///
/// # Returns
///
/// The age in seconds, or `None` if no number/unit pair was recognized
pub fn age_seconds(text: &str) -> Option<u64> {
    let mut total: Option<u64> = None;

    for caps in AGE_PART.captures_iter(text) {
        let Ok(amount) = caps[1].parse::<u64>() else {
            continue;
        };
        let unit = caps[2].to_ascii_lowercase();
        let scale = if unit.starts_with("mo") {
            30 * 86_400
        } else if unit.starts_with('s') {
            1
        } else if unit.starts_with('m') {
            60
        } else if unit.starts_with('h') {
            3_600
        } else if unit.starts_with('d') {
            86_400
        } else if unit.starts_with('w') {
            7 * 86_400
        } else if unit.starts_with('y') {
            365 * 86_400
        } else {
            continue;
        };
        total = Some(total.unwrap_or(0).saturating_add(amount.saturating_mul(scale)));
    }

    total
}

/// Re-sorts records on the client side
///
/// The sort is stable, so records that compare equal keep their document
/// order. For [`SortKey::ByUploadTime`] the newest record comes first and
/// records without readable upload time go last.
pub fn sort_records(records: &mut [ResourceRecord], key: SortKey) {
    match key {
        SortKey::ByName => {
            records.sort_by_cached_key(|r| r.name.to_lowercase());
        }
        SortKey::ByCategory => {
            records.sort_by_cached_key(|r| (r.category.to_lowercase(), r.name.to_lowercase()));
        }
        SortKey::ByUploadTime => {
            records.sort_by(|a, b| {
                let a_age = a.uploaded_at().and_then(age_seconds);
                let b_age = b.uploaded_at().and_then(age_seconds);
                match (a_age, b_age) {
                    (Some(a), Some(b)) => a.cmp(&b),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            });
        }
    }
}
