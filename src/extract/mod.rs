//! Resource extractor
//!
//! This module turns the HTML returned by the resource-list endpoint into
//! resource records. The markup is not under our control and is irregular, so
//! extraction is best-effort:
//! - a missing or malformed field falls back to a default and a diagnostic
//! - an entry is never dropped, even if nothing useful was recovered
//! - only a document with no recognizable structure at all is an error

mod diagnostic;
mod planets;
mod stats;
mod upload;

pub use diagnostic::{Diagnostic, DiagnosticField};
pub use stats::parse_stat_value;
pub use upload::split_upload;

use crate::resource::ResourceRecord;
use diagnostic::EntryContext;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// The document contained nothing that looks like a resource list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no resource containers or stat tables found in {document_length}-byte document, site format may have changed")]
pub struct ParseFailure {
    /// Length of the rejected body in bytes
    pub document_length: usize,
}

/// Records recovered from one document, plus the anomalies seen on the way
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Records in document order
    pub records: Vec<ResourceRecord>,

    /// Field- and entry-level diagnostics
    pub warnings: Vec<Diagnostic>,
}

static RESOURCE_BOX: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table.resourceStats div.resourceBox").expect("resource box selector is valid")
});

static TABLE_MARKER: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table.resourceStats, table.resAttr").expect("table marker selector is valid")
});

static NAME_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.nameLink").expect("name link selector is valid"));

/// Extracts resource records from a resource-list document
///
/// # Entry Layout
///
/// Each resource is a `div.resourceBox` inside `table.resourceStats`:
///
/// | Field | Source |
/// |-------|--------|
/// | name | first `a.nameLink` |
/// | category | second `a.nameLink` |
/// | planets | `ul.planetBar li.planetBarBox[title]`, else the category link slug |
/// | stats | `table.resAttr`, header row then one data row |
/// | upload | first `div.inlineBlock` reading `"... ago by ..."` |
///
/// # Arguments
///
/// * `html` - The raw response body
///
/// # Returns
///
/// * `Ok(Extraction)` - Records in document order plus diagnostics. A list
///   page with zero resources is a success with no records.
/// * `Err(ParseFailure)` - No resource containers and no stat-table markers
///   were found at all
///
/// # Example
///
/// ```
/// use harvest_watch::extract::extract;
///
/// let html = r#"<table class="resourceStats"><tr><td>
///   <div class="resourceBox">
///     <a class="nameLink" href="/resource.py/1">Aszolite</a>
///     <a class="nameLink" href="/resourceType.py/iron_naboo">Naboo Iron</a>
///   </div>
/// </td></tr></table>"#;
///
/// let extraction = extract(html).unwrap();
/// assert_eq!(extraction.records[0].name, "Aszolite");
/// assert_eq!(extraction.records[0].planets, vec!["Naboo".to_string()]);
/// ```
pub fn extract(html: &str) -> Result<Extraction, ParseFailure> {
    let document = Html::parse_document(html);

    let containers: Vec<ElementRef> = document.select(&RESOURCE_BOX).collect();
    if containers.is_empty() && document.select(&TABLE_MARKER).next().is_none() {
        tracing::warn!(
            "Document of {} bytes has no resource containers or stat tables",
            html.len()
        );
        return Err(ParseFailure {
            document_length: html.len(),
        });
    }

    let mut extraction = Extraction {
        records: Vec::with_capacity(containers.len()),
        warnings: Vec::new(),
    };

    for (index, container) in containers.into_iter().enumerate() {
        let mut ctx = EntryContext::new(index, &mut extraction.warnings);
        let record = extract_entry(container, &mut ctx);
        extraction.records.push(record);
    }

    if !extraction.warnings.is_empty() {
        tracing::warn!(
            "Extracted {} resources with {} diagnostics",
            extraction.records.len(),
            extraction.warnings.len()
        );
    } else {
        tracing::debug!("Extracted {} resources", extraction.records.len());
    }

    Ok(extraction)
}

/// Builds one complete record from a resource container
fn extract_entry(container: ElementRef, ctx: &mut EntryContext) -> ResourceRecord {
    let links: Vec<ElementRef> = container.select(&NAME_LINK).collect();

    let name = link_text(links.first().copied(), DiagnosticField::Name, ctx);
    let category = link_text(links.get(1).copied(), DiagnosticField::Category, ctx);
    let category_href = links.get(1).and_then(|link| link.value().attr("href"));

    let planets = planets::extract_planets(container, category_href, ctx);
    let stats = stats::extract_stats(container, ctx);
    let upload = upload::extract_upload(container, ctx);

    let record = ResourceRecord {
        name,
        category,
        planets,
        stats,
        upload,
    };

    if record.is_blank() {
        ctx.note(
            DiagnosticField::Entry,
            "no name, category or stats recovered",
        );
    }

    tracing::trace!("Entry {}: {:?}", ctx.index(), record);
    record
}

/// Reads the trimmed text of a labeled link, falling back to an empty string
fn link_text(link: Option<ElementRef>, field: DiagnosticField, ctx: &mut EntryContext) -> String {
    match link {
        Some(link) => {
            let text = element_text(link);
            if text.is_empty() {
                ctx.note(field, "link has no text");
            }
            text
        }
        None => {
            ctx.note(field, "link not found");
            String::new()
        }
    }
}

/// Collects an element's text with whitespace runs collapsed to single spaces
pub(crate) fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(boxes: &str) -> String {
        format!(
            r#"<html><body><table class="resourceStats"><tr><td>{}</td></tr></table></body></html>"#,
            boxes
        )
    }

    const FULL_BOX: &str = r#"
        <div class="resourceBox">
            <a class="nameLink" href="/resource.py/118/aszolite">Aszolite</a>
            <a class="nameLink" href="/resourceType.py/iron_corellia">Corellian Iron</a>
            <ul class="planetBar">
                <li class="planetBarBox" title="Corellia - marked available by Han_Solo">C</li>
                <li class="planetBarBox planetUnavailable" title="Naboo - not available">N</li>
            </ul>
            <table class="resAttr">
                <tr><td class="header"><span>OQ</span></td><td class="header"><span>CD</span></td></tr>
                <tr><td><span>912 (91%)</span></td><td><span>40 (4%)</span></td></tr>
            </table>
            <div class="inlineBlock">Iron</div>
            <div class="inlineBlock">2h ago by Han_Solo</div>
        </div>"#;

    #[test]
    fn test_extract_full_entry() {
        let extraction = extract(&wrap(FULL_BOX)).unwrap();
        assert_eq!(extraction.records.len(), 1);
        assert!(extraction.warnings.is_empty(), "{:?}", extraction.warnings);

        let record = &extraction.records[0];
        assert_eq!(record.name, "Aszolite");
        assert_eq!(record.category, "Corellian Iron");
        assert_eq!(record.planets, vec!["Corellia".to_string()]);
        assert_eq!(record.stats.len(), 2);
        assert_eq!(record.stat("OQ").unwrap().value, 912);
        assert_eq!(record.stat("CD").unwrap().percentage, 4);
        assert_eq!(record.uploaded_at(), Some("2h ago"));
        assert_eq!(record.uploaded_by(), Some("Han_Solo"));
    }

    #[test]
    fn test_extract_preserves_document_order() {
        let boxes = r#"
            <div class="resourceBox"><a class="nameLink">Zeta</a><a class="nameLink">Gas</a></div>
            <div class="resourceBox"><a class="nameLink">Alpha</a><a class="nameLink">Ore</a></div>
            <div class="resourceBox"><a class="nameLink">Mu</a><a class="nameLink">Gem</a></div>"#;
        let extraction = extract(&wrap(boxes)).unwrap();
        let names: Vec<_> = extraction.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mu"]);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let html = wrap(FULL_BOX);
        assert_eq!(extract(&html).unwrap(), extract(&html).unwrap());
    }

    #[test]
    fn test_missing_category_link_degrades() {
        let boxes = r#"<div class="resourceBox"><a class="nameLink">Solo</a></div>"#;
        let extraction = extract(&wrap(boxes)).unwrap();

        let record = &extraction.records[0];
        assert_eq!(record.name, "Solo");
        assert_eq!(record.category, "");
        assert!(extraction
            .warnings
            .iter()
            .any(|d| d.field == DiagnosticField::Category && d.entry == 0));
    }

    #[test]
    fn test_blank_entry_is_emitted_with_diagnostic() {
        let boxes = r#"
            <div class="resourceBox"><span>nothing here</span></div>
            <div class="resourceBox"><a class="nameLink">Real</a><a class="nameLink">Ore</a></div>"#;
        let extraction = extract(&wrap(boxes)).unwrap();

        assert_eq!(extraction.records.len(), 2);
        assert!(extraction.records[0].is_blank());
        assert!(extraction
            .warnings
            .iter()
            .any(|d| d.entry == 0 && d.field == DiagnosticField::Entry));
        assert!(!extraction
            .warnings
            .iter()
            .any(|d| d.entry == 1 && d.field != DiagnosticField::Stats));
    }

    #[test]
    fn test_empty_list_page_is_success() {
        let html = r#"<html><body><table class="resourceStats"></table></body></html>"#;
        let extraction = extract(html).unwrap();
        assert!(extraction.records.is_empty());
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_unrecognizable_document_fails() {
        let html = "<html><body><p>Please log in</p></body></html>";
        let err = extract(html).unwrap_err();
        assert_eq!(err.document_length, html.len());
    }

    #[test]
    fn test_non_html_input_fails() {
        assert!(extract("").is_err());
        assert!(extract("{\"error\": \"nope\"}").is_err());
    }

    #[test]
    fn test_whitespace_in_names_is_collapsed() {
        let boxes = r#"<div class="resourceBox">
            <a class="nameLink">
                Big
                Rock
            </a><a class="nameLink">Ore</a></div>"#;
        let extraction = extract(&wrap(boxes)).unwrap();
        assert_eq!(extraction.records[0].name, "Big Rock");
    }
}
