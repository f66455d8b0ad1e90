// src/specs/locations.rs
//! Location extraction from detail pages.
//!
//! Two independent sources, concatenated in this order and then deduplicated by
//! exact `(lat, lng)`:
//! 1. **Map links**: `<a href="https://www.google.com/maps/dir/?…&destination=LAT,LNG">`.
//!    The address comes from the text around the link (the link's parent),
//!    tried against `ADDRESS_RULES` in order, falling back to the whole
//!    neighbourhood text when it is short.
//! 2. **Inline scripts**: map widgets embed `lat: …, lng: …, address: "…"` literals.
//!
//! Only geocoded locations (both coordinates non-zero) are returned.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::config::consts::{MAPS_DIR_MARKER, MAX_FALLBACK_ADDRESS_CHARS};
use crate::core::html::neighborhood_text;
use crate::core::sanitize::normalize_ws;
use crate::model::Location;

static MAP_LINKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!(r#"a[href*="{MAPS_DIR_MARKER}"]"#)).unwrap()
});
static SCRIPTS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());

static RE_DESTINATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"destination=(-?\d+\.\d+)(?:,|%2[Cc])\s*(-?\d+\.\d+)").unwrap()
});
static RE_SCRIPT_TRIPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"lat:\s*(-?\d+(?:\.\d+)?)\s*,\s*lng:\s*(-?\d+(?:\.\d+)?)\s*,\s*address:\s*"((?:[^"\\]|\\.)*)""#)
        .unwrap()
});

// Street-type token, the rest of the clause, then an optional ", locality" clause.
static RE_STREET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(?:Via|Viale|Piazza|Piazzale|Corso|Largo|Vico|Vicolo|Contrada|Lungomare|",
        r"Street|Avenue|Road|Boulevard|Lane|Rue|Calle|Carrer|Avenida|Straße|Strasse|Platz)\b",
        r"[^,\n]+(?:,\s*[\w\s]+)?",
    ))
    .unwrap()
});
static RE_LABELLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:indirizzo|address|adresse|dirección)\s*:\s*([^,\n]+(?:,\s*[^,\n]+)?)").unwrap()
});

pub struct AddressRule {
    pub name: &'static str,
    regex: &'static LazyLock<Regex>,
    /// Capture group holding the address (0 = whole match).
    group: usize,
}

/// Priority order for addresses next to a map link.
pub static ADDRESS_RULES: [AddressRule; 2] = [
    AddressRule { name: "street_keyword", regex: &RE_STREET, group: 0 },
    AddressRule { name: "labelled", regex: &RE_LABELLED, group: 1 },
];

impl AddressRule {
    pub fn find(&self, text: &str) -> Option<String> {
        let cap = self.regex.captures(text)?;
        let address = normalize_ws(cap.get(self.group)?.as_str());
        if address.is_empty() { None } else { Some(address) }
    }
}

/// Best-effort address from the text around a map link.
pub fn address_near(text: &str) -> Option<String> {
    if let Some(found) = ADDRESS_RULES.iter().find_map(|rule| rule.find(text)) {
        return Some(found);
    }
    let text = normalize_ws(text);
    if !text.is_empty() && text.chars().count() < MAX_FALLBACK_ADDRESS_CHARS {
        Some(text)
    } else {
        None
    }
}

/// `(lat, lng)` from a maps directions URL.
pub fn parse_destination(href: &str) -> Option<(f64, f64)> {
    let cap = RE_DESTINATION.captures(href)?;
    let lat = cap.get(1)?.as_str().parse().ok()?;
    let lng = cap.get(2)?.as_str().parse().ok()?;
    Some((lat, lng))
}

pub fn from_map_links(html: &Html) -> Vec<Location> {
    html.select(&MAP_LINKS)
        .filter_map(|link| {
            let (lat, lng) = parse_destination(link.value().attr("href")?)?;
            let address = address_near(&neighborhood_text(link));
            Some(Location::new(address, lat, lng))
        })
        .filter(Location::is_geocoded)
        .collect()
}

pub fn from_scripts(html: &Html) -> Vec<Location> {
    let mut out = Vec::new();
    for script in html.select(&SCRIPTS) {
        let body: String = script.text().collect();
        if !body.contains("lat:") && !body.contains("lng:") {
            continue;
        }
        for cap in RE_SCRIPT_TRIPLE.captures_iter(&body) {
            let (Ok(lat), Ok(lng)) = (cap[1].parse::<f64>(), cap[2].parse::<f64>()) else { continue };
            let address = normalize_ws(&unescape_js(&cap[3]));
            let address = if address.is_empty() { None } else { Some(address) };
            out.push(Location::new(address, lat, lng));
        }
    }
    out.retain(Location::is_geocoded);
    out
}

/// Map links first, then script literals; first of each coordinate pair wins.
pub fn from_page(html: &Html) -> Vec<Location> {
    let mut seen: HashSet<(u64, u64)> = HashSet::new();
    from_map_links(html)
        .into_iter()
        .chain(from_scripts(html))
        .filter(|loc| seen.insert(loc.coord_key()))
        .collect()
}

fn unescape_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') | Some('t') => out.push(' '),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> &'static AddressRule {
        ADDRESS_RULES.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn destination_coordinates() {
        let href = "https://www.google.com/maps/dir/?api=1&destination=40.8512,14.2561";
        assert_eq!(parse_destination(href), Some((40.8512, 14.2561)));
        assert_eq!(parse_destination("https://www.google.com/maps/dir/?destination=-33.86%2C151.21"), Some((-33.86, 151.21)));
        assert_eq!(parse_destination("https://www.google.com/maps/dir/?destination=Napoli"), None);
    }

    #[test]
    fn street_rule_takes_the_locality_clause() {
        assert_eq!(
            rule("street_keyword").find("Sede: Via dei Tribunali 32, 80138 Napoli").as_deref(),
            Some("Via dei Tribunali 32, 80138 Napoli")
        );
        assert_eq!(
            rule("street_keyword").find("12 rue de la Paix, Paris").as_deref(),
            Some("rue de la Paix, Paris")
        );
    }

    #[test]
    fn labelled_rule_drops_the_label() {
        assert_eq!(
            rule("labelled").find("Indirizzo: Largo Maradona 1, Napoli").as_deref(),
            Some("Largo Maradona 1, Napoli")
        );
    }

    #[test]
    fn fallback_is_short_neighbourhood_text_only() {
        assert_eq!(address_near("Centro storico").as_deref(), Some("Centro storico"));
        assert_eq!(address_near(&"x ".repeat(150)), None);
        assert_eq!(address_near("   "), None);
    }

    #[test]
    fn map_links_need_both_coordinates() {
        let html = Html::parse_document(r#"
            <div class="sede"><p>Via Partenope 1, Napoli
              <a href="https://www.google.com/maps/dir/?api=1&destination=40.8296,14.2479">Indicazioni</a></p></div>
            <div class="sede"><p>Corso Italia 5
              <a href="https://www.google.com/maps/dir/?api=1&destination=Napoli">Indicazioni</a></p></div>
            <div class="sede"><p>Somewhere
              <a href="https://www.google.com/maps/dir/?api=1&destination=0.0,0.0">Indicazioni</a></p></div>
        "#);
        let locs = from_map_links(&html);
        assert_eq!(locs, vec![Location::new(Some(s!("Via Partenope 1, Napoli Indicazioni")), 40.8296, 14.2479)]);
    }

    #[test]
    fn script_triples() {
        let html = Html::parse_document(r#"
            <script>var ga = {id: 1};</script>
            <script>
              var sedi = [
                { lat: 45.4642, lng: 9.19, address: "Corso \"Garibaldi\" 12, Milano" },
                { lat: 45.47, lng: 9.2, address: "" }
              ];
            </script>
        "#);
        let locs = from_scripts(&html);
        assert_eq!(locs.len(), 2);
        assert_eq!(locs[0].address.as_deref(), Some("Corso \"Garibaldi\" 12, Milano"));
        assert_eq!(locs[1].address, None);
    }

    #[test]
    fn page_dedups_by_exact_coordinates_map_links_first() {
        let html = Html::parse_document(r#"
            <p>Via Toledo 10, Napoli <a href="https://www.google.com/maps/dir/?destination=40.84,14.25">Vai</a></p>
            <p>Piazza Dante 3 <a href="https://www.google.com/maps/dir/?destination=40.84,14.25">Vai</a></p>
            <script>markers.push({lat: 40.84, lng: 14.25, address: "dup"}); markers.push({lat: 40.9, lng: 14.3, address: "Via Roma 2"});</script>
        "#);
        let locs = from_page(&html);
        assert_eq!(locs.len(), 2);
        assert_eq!(locs[0].address.as_deref(), Some("Via Toledo 10, Napoli Vai"));
        assert_eq!(locs[1].address.as_deref(), Some("Via Roma 2"));
    }
}
