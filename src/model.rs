// src/model.rs
//
// Records produced by the page parsers and persisted by the store.
// JSON field names follow the published dataset (`url`, `lat`, `lng`, `value`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::sanitize::normalize_ws;

/// One entry of the site's city dropdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    /// Opaque option value; only the site knows what it means.
    #[serde(rename = "value")]
    pub external_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(address: Option<String>, lat: f64, lng: f64) -> Self {
        Self { address, lat, lng }
    }

    /// Usable on a map: both coordinates present, finite and non-zero.
    pub fn is_geocoded(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite() && self.lat != 0.0 && self.lng != 0.0
    }

    /// Exact coordinate identity (bit pattern), for dedup.
    pub fn coord_key(&self) -> (u64, u64) {
        (self.lat.to_bits(), self.lng.to_bits())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub rank: Option<u32>,
    pub name: String,
}

impl Award {
    pub fn ranked(rank: u32, name: impl AsRef<str>) -> Self {
        Self { rank: Some(rank), name: normalize_ws(name.as_ref()) }
    }

    pub fn unranked(name: impl AsRef<str>) -> Self {
        Self { rank: None, name: normalize_ws(name.as_ref()) }
    }

    /// Dedup identity: case-insensitive, whitespace collapsed.
    pub fn key(&self) -> String {
        award_key(&self.name)
    }
}

pub fn award_key(name: &str) -> String {
    normalize_ws(name).to_lowercase()
}

/// Search-result entry, before the detail page is read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PizzeriaLink {
    pub name: String,
    pub url: String,
}

/// What one detail page yields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Details {
    pub locations: Vec<Location>,
    pub awards: Vec<Award>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pizzeria {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub awards: Vec<Award>,
}

impl Pizzeria {
    pub fn from_parts(link: PizzeriaLink, details: Details) -> Self {
        Self {
            name: link.name,
            url: link.url,
            locations: details.locations,
            awards: details.awards,
        }
    }

    pub fn has_geocoded_location(&self) -> bool {
        self.locations.iter().any(Location::is_geocoded)
    }

    /// Worth keeping: at least one usable location or at least one award.
    pub fn is_worth_keeping(&self) -> bool {
        self.has_geocoded_location() || !self.awards.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    #[serde(default)]
    pub pizzerias: Vec<Pizzeria>,
}

impl CityRecord {
    pub fn location_count(&self) -> usize {
        self.pizzerias.iter().map(|p| p.locations.len()).sum()
    }
}

/// Accumulated crawl output, keyed by city name in first-recorded order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityDataset(IndexMap<String, CityRecord>);

impl CityDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, city: &str) -> Option<&CityRecord> {
        self.0.get(city)
    }

    /// Replace the city's record wholesale. Keeps the city's original slot.
    pub fn insert(&mut self, city: impl Into<String>, record: CityRecord) {
        self.0.insert(city.into(), record);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CityRecord)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pizzeria_count(&self) -> usize {
        self.0.values().map(|c| c.pizzerias.len()).sum()
    }

    pub fn location_count(&self) -> usize {
        self.0.values().map(CityRecord::location_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_or_nan_coordinates_are_not_geocoded() {
        assert!(Location::new(None, 41.9, 12.5).is_geocoded());
        assert!(!Location::new(None, 0.0, 12.5).is_geocoded());
        assert!(!Location::new(None, 41.9, f64::NAN).is_geocoded());
    }

    #[test]
    fn award_key_ignores_case_and_spacing() {
        let a = Award::unranked("50 Top  Pizza\nItalia 2024");
        assert_eq!(a.name, "50 Top Pizza Italia 2024");
        assert_eq!(a.key(), award_key("50 TOP PIZZA ITALIA 2024"));
    }

    #[test]
    fn dataset_json_shape() {
        let mut ds = CityDataset::new();
        ds.insert("Roma", CityRecord {
            pizzerias: vec![Pizzeria {
                name: s!("Seu"),
                url: s!("https://www.50toppizza.it/referenza/seu/"),
                locations: vec![Location::new(Some(s!("Via Angelo Bargoni 10")), 41.88, 12.47)],
                awards: vec![Award::ranked(1, "50 Top Pizza Italia 2024")],
            }],
        });

        let v = serde_json::to_value(&ds).unwrap();
        let p = &v["Roma"]["pizzerias"][0];
        assert_eq!(p["url"], "https://www.50toppizza.it/referenza/seu/");
        assert_eq!(p["locations"][0]["lat"], 41.88);
        assert_eq!(p["awards"][0]["rank"], 1);
    }

    #[test]
    fn older_files_without_awards_still_load() {
        let text = r#"{"Napoli":{"pizzerias":[{"name":"Sorbillo","url":"u","locations":[{"address":null,"lat":40.85,"lng":14.25}]}]}}"#;
        let ds: CityDataset = serde_json::from_str(text).unwrap();
        let p = &ds.get("Napoli").unwrap().pizzerias[0];
        assert!(p.awards.is_empty());
        assert_eq!(ds.location_count(), 1);
    }
}
