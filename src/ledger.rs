// src/ledger.rs
//
// Per-city crawl progress: `pending → scraped`, never back except by a full
// reset. `stats` is recomputed from `cities` on every mutation and on load,
// so the persisted copy can never drift.

use chrono::{Local, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::consts::LEDGER_VERSION;
use crate::error::StoreError;
use crate::model::{City, CityDataset};
use crate::store::Store;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CityStatus {
    #[default]
    Pending,
    Scraped,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityProgress {
    pub status: CityStatus,
    #[serde(default)]
    pub scraped_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub pizzeria_count: usize,
    #[serde(default)]
    pub location_count: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_cities: usize,
    pub scraped_cities: usize,
    pub pending_cities: usize,
    pub total_pizzerias: usize,
    pub total_locations: usize,
}

impl LedgerStats {
    fn of(cities: &IndexMap<String, CityProgress>) -> Self {
        let mut stats = Self { total_cities: cities.len(), ..Self::default() };
        for progress in cities.values() {
            match progress.status {
                CityStatus::Pending => stats.pending_cities += 1,
                CityStatus::Scraped => {
                    stats.scraped_cities += 1;
                    stats.total_pizzerias += progress.pizzeria_count;
                    stats.total_locations += progress.location_count;
                }
            }
        }
        stats
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressLedger {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    last_updated: Option<NaiveDateTime>,
    #[serde(default)]
    cities: IndexMap<String, CityProgress>,
    #[serde(default)]
    stats: LedgerStats,
}

fn default_version() -> String {
    s!(LEDGER_VERSION)
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl Default for ProgressLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressLedger {
    /// Empty ledger: no cities, zeroed stats, never saved.
    pub fn new() -> Self {
        Self {
            version: default_version(),
            last_updated: None,
            cities: IndexMap::new(),
            stats: LedgerStats::default(),
        }
    }

    /// Last saved ledger, or an empty one when there is none or it can't be read.
    pub fn load(store: &dyn Store) -> Self {
        match store.load_ledger() {
            Ok(Some(mut ledger)) => {
                ledger.refresh_stats();
                ledger
            }
            Ok(None) => Self::new(),
            Err(e) => {
                logw!("Progress ledger unreadable, starting over: {e}");
                Self::new()
            }
        }
    }

    /// Stamp `last_updated` and write the ledger out.
    pub fn persist(&mut self, store: &dyn Store) -> Result<(), StoreError> {
        self.last_updated = Some(now());
        store.save_ledger(self)
    }

    /// Register `city` as pending unless it is already known.
    pub fn mark_pending(&mut self, city: &str) {
        if !self.cities.contains_key(city) {
            self.cities.insert(s!(city), CityProgress::default());
        }
        self.refresh_stats();
    }

    pub fn mark_scraped(
        &mut self,
        store: &dyn Store,
        city: &str,
        pizzeria_count: usize,
        location_count: usize,
    ) -> Result<(), StoreError> {
        self.set_scraped(city, now(), pizzeria_count, location_count);
        self.persist(store)
    }

    /// Forget everything and persist the empty ledger.
    pub fn reset(&mut self, store: &dyn Store) -> Result<(), StoreError> {
        *self = Self::new();
        self.persist(store)
    }

    /// Force every city that has pizzerias in `dataset` to `scraped` with
    /// counts taken from the data. Cities missing from `dataset` are untouched.
    pub fn sync(&mut self, store: &dyn Store, dataset: &CityDataset) -> Result<usize, StoreError> {
        let mut synced = 0;
        for (city, record) in dataset.iter() {
            if record.pizzerias.is_empty() {
                continue;
            }
            let scraped_at = self
                .cities
                .get(city.as_str())
                .and_then(|p| p.scraped_at)
                .unwrap_or_else(now);
            self.set_scraped(city, scraped_at, record.pizzerias.len(), record.location_count());
            synced += 1;
        }
        self.persist(store)?;
        Ok(synced)
    }

    /// Catalog cities not yet scraped, in catalog order.
    pub fn pending_cities<'c>(&self, catalog: &'c [City]) -> Vec<&'c City> {
        catalog.iter().filter(|c| !self.is_scraped(&c.name)).collect()
    }

    pub fn is_scraped(&self, city: &str) -> bool {
        self.cities.get(city).is_some_and(|p| p.status == CityStatus::Scraped)
    }

    pub fn city(&self, city: &str) -> Option<&CityProgress> {
        self.cities.get(city)
    }

    pub fn cities(&self) -> impl Iterator<Item = (&String, &CityProgress)> {
        self.cities.iter()
    }

    pub fn stats(&self) -> &LedgerStats {
        &self.stats
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn last_updated(&self) -> Option<NaiveDateTime> {
        self.last_updated
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    fn set_scraped(&mut self, city: &str, at: NaiveDateTime, pizzerias: usize, locations: usize) {
        let entry = CityProgress {
            status: CityStatus::Scraped,
            scraped_at: Some(at),
            pizzeria_count: pizzerias,
            location_count: locations,
        };
        self.cities.insert(s!(city), entry);
        self.refresh_stats();
    }

    fn refresh_stats(&mut self) {
        self.stats = LedgerStats::of(&self.cities);
    }
}
