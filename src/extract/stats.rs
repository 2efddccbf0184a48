//! Stat table extraction
//!
//! Every resource carries a two-row attribute table: header labels, then one
//! row of `"<value> (<percentage>%)"` cells. Headers and cells are paired by
//! column index.

use crate::extract::diagnostic::EntryContext;
use crate::extract::{element_text, DiagnosticField};
use crate::resource::{StatTable, StatValue};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

static STAT_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.resAttr").expect("stat table selector is valid"));

static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("row selector is valid"));

static CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th").expect("cell selector is valid"));

static STAT_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*\(\s*(\d+)\s*%\s*\)").expect("stat value pattern is valid"));

/// Parses a stat cell such as `"912 (91%)"`
///
/// # Returns
///
/// The value and percentage, or `None` if the text does not match, a number
/// overflows, or the percentage is above 100
///
/// # Example
///
/// ```
/// use harvest_watch::extract::parse_stat_value;
///
/// let stat = parse_stat_value("912 (91%)").unwrap();
/// assert_eq!((stat.value, stat.percentage), (912, 91));
/// assert!(parse_stat_value("").is_none());
/// ```
pub fn parse_stat_value(text: &str) -> Option<StatValue> {
    let caps = STAT_VALUE.captures(text)?;
    let value = caps[1].parse::<u32>().ok()?;
    let percentage = caps[2].parse::<u8>().ok().filter(|p| *p <= 100)?;
    Some(StatValue { value, percentage })
}

/// Reads the entry's stat table into an ordered map
///
/// Only the first two rows are read. Cells that do not hold a stat value are
/// left out, and a header/data length mismatch just pairs up as many columns
/// as both rows have.
pub(crate) fn extract_stats(container: ElementRef, ctx: &mut EntryContext) -> StatTable {
    let mut stats = StatTable::new();

    let Some(table) = container.select(&STAT_TABLE).next() else {
        ctx.note(DiagnosticField::Stats, "no attribute table");
        return stats;
    };

    let mut rows = table.select(&ROW);
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.select(&CELL).map(element_text).collect(),
        None => {
            ctx.note(DiagnosticField::Stats, "attribute table has no rows");
            return stats;
        }
    };
    let Some(data_row) = rows.next() else {
        ctx.note(DiagnosticField::Stats, "attribute table has no data row");
        return stats;
    };

    for (column, (header, cell)) in headers.iter().zip(data_row.select(&CELL)).enumerate() {
        let text = element_text(cell);
        let Some(stat) = parse_stat_value(&text) else {
            // Blank or dash cells are stats this resource type does not have
            tracing::trace!("Entry {}: column {} has no stat value", ctx.index(), column);
            continue;
        };

        if header.is_empty() {
            ctx.note(
                DiagnosticField::Stats,
                format!("value in column {} has no header label", column),
            );
            continue;
        }

        if stats.contains_key(header) {
            ctx.note(
                DiagnosticField::Stats,
                format!("duplicate stat header '{}' in column {}", header, column),
            );
            continue;
        }

        stats.insert(header.clone(), stat);
    }

    stats
}
