//! Known planet names
//!
//! Used when an entry has no explicit planet indicators and the availability
//! has to be read from the slug at the end of its category link.

/// A planet the site can list resources for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownPlanet {
    /// Display name, already title-cased
    pub name: &'static str,

    /// Lowercase alphanumeric slugs that identify this planet
    pub slugs: &'static [&'static str],
}

/// Every planet the slug fallback recognizes, one entry per planet
pub const KNOWN_PLANETS: &[KnownPlanet] = &[
    KnownPlanet { name: "Corellia", slugs: &["corellia"] },
    KnownPlanet { name: "Dantooine", slugs: &["dantooine"] },
    KnownPlanet { name: "Dathomir", slugs: &["dathomir"] },
    KnownPlanet { name: "Endor", slugs: &["endor"] },
    KnownPlanet { name: "Lok", slugs: &["lok"] },
    KnownPlanet { name: "Naboo", slugs: &["naboo"] },
    KnownPlanet { name: "Rori", slugs: &["rori"] },
    KnownPlanet { name: "Talus", slugs: &["talus"] },
    KnownPlanet { name: "Tatooine", slugs: &["tatooine"] },
    KnownPlanet { name: "Yavin 4", slugs: &["yavin4", "yavin"] },
];

/// Resolves a link slug to a planet display name
///
/// Matching is case-insensitive and ignores anything that is not a letter or
/// digit, so `"Naboo"`, `"naboo"` and `"yavin_4"` style fragments resolve.
///
/// # Arguments
///
/// * `slug` - Trailing segment of a link target
///
/// # Returns
///
/// The planet's display name, or `None` if the slug names no known planet
pub fn planet_from_slug(slug: &str) -> Option<&'static str> {
    let normalized: String = slug
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if normalized.is_empty() {
        return None;
    }

    KNOWN_PLANETS
        .iter()
        .find(|planet| planet.slugs.iter().any(|s| *s == normalized))
        .map(|planet| planet.name)
}
