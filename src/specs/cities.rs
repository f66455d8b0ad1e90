// src/specs/cities.rs
//! Scraping *spec* for the city catalog.
//!
//! Purpose:
//! - Parse the **search landing page** and read the city dropdown
//!   (`select#comuneSelect2 > option`) into `City { name, external_id }`.
//!
//! Non-Responsibilities:
//! - **No fetching.** The caller hands in the page body.
//! - **No failure policy.** An empty result is returned as-is; the run loop
//!   decides that zero cities is fatal.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::config::consts::CITY_SELECT_ID;
use crate::core::sanitize::normalize_ws;
use crate::model::City;

static CITY_OPTIONS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!("select#{CITY_SELECT_ID} option")).unwrap()
});

/// Cities in dropdown order. Options with an empty label or value (the
/// "choose a city" placeholder) are skipped.
pub fn parse(doc: &str) -> Vec<City> {
    let html = Html::parse_document(doc);

    html.select(&CITY_OPTIONS)
        .filter_map(|opt| {
            let name = normalize_ws(&opt.text().collect::<String>());
            let value = opt.value().attr("value").unwrap_or("").trim();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some(City { name, external_id: s!(value) })
        })
        .collect()
}
