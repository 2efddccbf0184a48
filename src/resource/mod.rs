//! Resource data model
//!
//! This module defines the records produced by the extractor, including:
//! - The resource record itself and its stat table
//! - The sort keys understood by the site (and their client-facing names)
//! - The table of known planets used for availability fallback

mod planet;
mod sort;

pub use planet::{planet_from_slug, KnownPlanet, KNOWN_PLANETS};
pub use sort::{age_seconds, sort_records, SortKey};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single stat reading, e.g. `"912 (91%)"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatValue {
    /// Raw stat value
    pub value: u32,

    /// Percentage of the stat cap, 0 to 100
    pub percentage: u8,
}

/// Stats keyed by header label, in column order
pub type StatTable = IndexMap<String, StatValue>;

/// Upload metadata split from text like `"2h ago by Han_Solo"`
///
/// Both halves come from one text block, so they are either both present or
/// the whole value is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    /// Relative time exactly as shown, e.g. `"2h ago"`
    pub uploaded_at: String,

    /// Name of the user who reported the resource
    pub uploaded_by: String,
}

/// A harvestable resource as listed by the site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// Resource name; empty only when the entry had no usable name link
    pub name: String,

    /// Category / type label, may be empty
    pub category: String,

    /// Planets the resource is available on, unique, in document order
    pub planets: Vec<String>,

    /// Stats in column order; stats without a readable value are absent
    pub stats: StatTable,

    /// Upload time and uploader, if the entry carried them
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<Upload>,
}

impl ResourceRecord {
    /// Returns the relative upload time text, if present
    pub fn uploaded_at(&self) -> Option<&str> {
        self.upload.as_ref().map(|u| u.uploaded_at.as_str())
    }

    /// Returns the uploader name, if present
    pub fn uploaded_by(&self) -> Option<&str> {
        self.upload.as_ref().map(|u| u.uploaded_by.as_str())
    }

    /// Looks up a stat by its header label
    pub fn stat(&self, name: &str) -> Option<&StatValue> {
        self.stats.get(name)
    }

    /// Returns true if nothing identifying was recovered for this entry
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.category.is_empty() && self.stats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResourceRecord {
        let mut stats = StatTable::new();
        stats.insert("OQ".to_string(), StatValue { value: 912, percentage: 91 });
        stats.insert("CD".to_string(), StatValue { value: 40, percentage: 4 });
        ResourceRecord {
            name: "Aszolite".to_string(),
            category: "Corellian Iron".to_string(),
            planets: vec!["Corellia".to_string()],
            stats,
            upload: Some(Upload {
                uploaded_at: "2h ago".to_string(),
                uploaded_by: "Han_Solo".to_string(),
            }),
        }
    }

    #[test]
    fn test_upload_accessors() {
        let record = sample();
        assert_eq!(record.uploaded_at(), Some("2h ago"));
        assert_eq!(record.uploaded_by(), Some("Han_Solo"));

        let bare = ResourceRecord::default();
        assert_eq!(bare.uploaded_at(), None);
        assert_eq!(bare.uploaded_by(), None);
    }

    #[test]
    fn test_is_blank() {
        assert!(ResourceRecord::default().is_blank());
        assert!(!sample().is_blank());
    }

    #[test]
    fn test_json_field_names_and_stat_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"uploadedAt\":\"2h ago\""));
        assert!(json.contains("\"uploadedBy\":\"Han_Solo\""));
        let oq = json.find("\"OQ\"").unwrap();
        let cd = json.find("\"CD\"").unwrap();
        assert!(oq < cd, "stats must serialize in column order");
    }

    #[test]
    fn test_absent_upload_is_omitted_from_json() {
        let json = serde_json::to_string(&ResourceRecord::default()).unwrap();
        assert!(!json.contains("uploadedAt"));
        assert!(!json.contains("uploadedBy"));

        let parsed: ResourceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.upload, None);
    }
}
