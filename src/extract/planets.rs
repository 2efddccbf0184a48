//! Planet availability
//!
//! Availability normally comes from the entry's planet bar. Some entries have
//! no planet bar and only carry the planet in the slug of their category link,
//! so that is tried second.

use crate::extract::diagnostic::EntryContext;
use crate::extract::DiagnosticField;
use crate::resource::planet_from_slug;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static PLANET_INDICATOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("ul.planetBar li.planetBarBox").expect("planet indicator selector is valid")
});

const UNAVAILABLE_CLASS: &str = "planetUnavailable";
const LABEL_SEPARATOR: &str = " - ";

/// Recovers the planets a resource is available on
///
/// # Arguments
///
/// * `container` - The resource container
/// * `category_href` - Target of the entry's category link, if any
/// * `ctx` - Diagnostic collector for this entry
///
/// # Returns
///
/// Unique planet names in document order; possibly empty
pub(crate) fn extract_planets(
    container: ElementRef,
    category_href: Option<&str>,
    ctx: &mut EntryContext,
) -> Vec<String> {
    let planets = planets_from_indicators(container, ctx);
    if !planets.is_empty() {
        return planets;
    }

    match category_href.and_then(planet_from_href) {
        Some(planet) => {
            tracing::debug!(
                "Entry {}: no planet indicators, using category link slug ({})",
                ctx.index(),
                planet
            );
            vec![planet.to_string()]
        }
        None => Vec::new(),
    }
}

/// Reads every available planet indicator
///
/// An indicator is available unless it carries the `planetUnavailable` class.
/// Its label has the form `"<Planet> - <explanation>"`.
fn planets_from_indicators(container: ElementRef, ctx: &mut EntryContext) -> Vec<String> {
    let mut planets: Vec<String> = Vec::new();

    for indicator in container.select(&PLANET_INDICATOR) {
        if indicator.value().classes().any(|c| c == UNAVAILABLE_CLASS) {
            continue;
        }

        let label = indicator.value().attr("title").unwrap_or("");
        match planet_from_label(label) {
            Some(planet) => {
                if !planets.iter().any(|p| p.eq_ignore_ascii_case(planet)) {
                    planets.push(planet.to_string());
                }
            }
            None => ctx.note(
                DiagnosticField::Planets,
                "available planet indicator has no planet label",
            ),
        }
    }

    planets
}

/// Takes the planet name from a label like `"Naboo - marked available by X"`
fn planet_from_label(label: &str) -> Option<&str> {
    let name = label
        .split(LABEL_SEPARATOR)
        .next()
        .unwrap_or("")
        .trim();
    (!name.is_empty()).then_some(name)
}

/// Resolves the trailing segment of a link target to a known planet
///
/// The segment is whatever follows the last `/`, `_`, `=`, `?` or `&`, so
/// `.../resource_type_naboo` and `...?type=iron_naboo` both yield `"naboo"`.
pub(crate) fn planet_from_href(href: &str) -> Option<&'static str> {
    let trimmed = href.trim().trim_end_matches('/');
    let slug = trimmed
        .split('#')
        .next()
        .unwrap_or("")
        .rsplit(|c| matches!(c, '/' | '_' | '=' | '?' | '&'))
        .next()
        .unwrap_or("");
    planet_from_slug(slug)
}
