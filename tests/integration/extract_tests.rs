//! Integration tests for resource extraction
//!
//! These tests run the extractor over a saved resource-list page that mixes
//! complete, partial and empty entries.

use harvest_watch::extract::{extract, DiagnosticField};
use harvest_watch::resource::StatValue;

const RESOURCE_LIST: &str = include_str!("../fixtures/resource_list.html");

#[test]
fn test_every_container_yields_a_record_in_order() {
    let extraction = extract(RESOURCE_LIST).unwrap();

    let names: Vec<&str> = extraction.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Aszolite", "Zeddite", ""]);
}

#[test]
fn test_complete_entry() {
    let extraction = extract(RESOURCE_LIST).unwrap();
    let record = &extraction.records[0];

    assert_eq!(record.category, "Corellian Iron");
    assert_eq!(record.planets, vec!["Corellia".to_string(), "Talus".to_string()]);

    let stat_names: Vec<&str> = record.stats.keys().map(String::as_str).collect();
    assert_eq!(stat_names, vec!["CD", "OQ"]);
    assert_eq!(record.stat("OQ"), Some(&StatValue { value: 912, percentage: 91 }));
    assert_eq!(record.stat("CD"), Some(&StatValue { value: 40, percentage: 4 }));
    assert_eq!(record.stat("ER"), None);

    assert_eq!(record.uploaded_at(), Some("2h ago"));
    assert_eq!(record.uploaded_by(), Some("Han_Solo"));
}

#[test]
fn test_planet_falls_back_to_category_slug() {
    let extraction = extract(RESOURCE_LIST).unwrap();
    let record = &extraction.records[1];

    assert_eq!(record.planets, vec!["Naboo".to_string()]);
    assert!(!extraction
        .warnings
        .iter()
        .any(|d| d.entry == 1 && d.field == DiagnosticField::Planets));
}

#[test]
fn test_single_matching_column() {
    let extraction = extract(RESOURCE_LIST).unwrap();
    let record = &extraction.records[1];

    assert_eq!(record.stats.len(), 1);
    assert_eq!(record.stat("Quality"), Some(&StatValue { value: 700, percentage: 70 }));
    assert!(record.upload.is_none());
}

#[test]
fn test_blank_entry_is_kept_with_diagnostics() {
    let extraction = extract(RESOURCE_LIST).unwrap();
    let record = &extraction.records[2];

    assert!(record.is_blank());
    assert!(record.planets.is_empty());
    assert!(record.upload.is_none());

    let fields: Vec<DiagnosticField> = extraction
        .warnings
        .iter()
        .filter(|d| d.entry == 2)
        .map(|d| d.field)
        .collect();
    assert!(fields.contains(&DiagnosticField::Name));
    assert!(fields.contains(&DiagnosticField::Category));
    assert!(fields.contains(&DiagnosticField::Entry));
}

#[test]
fn test_complete_entry_has_no_diagnostics() {
    let extraction = extract(RESOURCE_LIST).unwrap();
    assert!(!extraction.warnings.iter().any(|d| d.entry == 0));
}

#[test]
fn test_extraction_is_deterministic() {
    let first = extract(RESOURCE_LIST).unwrap();
    let second = extract(RESOURCE_LIST).unwrap();

    assert_eq!(first.records, second.records);
    assert_eq!(first.warnings, second.warnings);
}

#[test]
fn test_records_serialize_with_flat_upload() {
    let extraction = extract(RESOURCE_LIST).unwrap();
    let json = serde_json::to_value(&extraction.records[0]).unwrap();

    assert_eq!(json["name"], "Aszolite");
    assert_eq!(json["uploadedAt"], "2h ago");
    assert_eq!(json["uploadedBy"], "Han_Solo");
    assert_eq!(json["stats"]["OQ"]["value"], 912);

    let json = serde_json::to_value(&extraction.records[1]).unwrap();
    assert!(json.get("uploadedAt").is_none());
}

#[test]
fn test_maintenance_page_is_a_parse_failure() {
    let html = "<html><body><h1>Down for maintenance</h1></body></html>";
    let failure = extract(html).unwrap_err();
    assert_eq!(failure.document_length, html.len());
}

#[test]
fn test_empty_list_is_not_a_failure() {
    let html = r#"<html><body><table class="resourceStats"></table></body></html>"#;
    let extraction = extract(html).unwrap();
    assert!(extraction.records.is_empty());
    assert!(extraction.warnings.is_empty());
}
