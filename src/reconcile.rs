// src/reconcile.rs
//
// Folds one city's extracted pizzerias into the accumulated dataset.
//
// A `(pizzeria name, lat, lng)` triple belongs to the first city it was
// recorded under, for the lifetime of the dataset. The tracker is rebuilt from
// the dataset once per run and then extended as cities are reconciled.

use std::collections::HashMap;

use crate::model::{CityDataset, CityRecord, Location, Pizzeria};

type TripleKey = (String, u64, u64);

fn triple(name: &str, loc: &Location) -> TripleKey {
    let (lat, lng) = loc.coord_key();
    (name.to_owned(), lat, lng)
}

/// `(pizzeria name, lat, lng)` → first city.
#[derive(Debug, Default)]
pub struct LocationTracker {
    owners: HashMap<TripleKey, String>,
}

pub enum Claim {
    /// Unseen triple, now bound to the claiming city.
    New,
    /// Already bound to the claiming city.
    Own,
    /// Bound to another city, which stays authoritative.
    Foreign,
}

impl LocationTracker {
    /// Replay every triple of `dataset`, in dataset order.
    pub fn from_dataset(dataset: &CityDataset) -> Self {
        let mut tracker = Self::default();
        for (city, record) in dataset.iter() {
            for pizzeria in &record.pizzerias {
                for loc in &pizzeria.locations {
                    tracker.claim(city, &pizzeria.name, loc);
                }
            }
        }
        tracker
    }

    pub fn claim(&mut self, city: &str, name: &str, loc: &Location) -> Claim {
        match self.owners.get(&triple(name, loc)) {
            Some(owner) if owner == city => Claim::Own,
            Some(_) => Claim::Foreign,
            None => {
                self.owners.insert(triple(name, loc), city.to_owned());
                Claim::New
            }
        }
    }

    pub fn owner(&self, name: &str, loc: &Location) -> Option<&str> {
        self.owners.get(&triple(name, loc)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Result of folding one city.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CityOutcome {
    pub pizzerias: usize,
    pub locations: usize,
    pub duplicates_skipped: usize,
    /// The city's record in the dataset was replaced.
    pub written: bool,
}

#[derive(Debug)]
pub struct Reconciler {
    dataset: CityDataset,
    tracker: LocationTracker,
    duplicates_skipped: usize,
}

impl Reconciler {
    pub fn new(dataset: CityDataset) -> Self {
        let tracker = LocationTracker::from_dataset(&dataset);
        Self { dataset, tracker, duplicates_skipped: 0 }
    }

    /// Drop locations owned by another city, keep pizzerias with a location
    /// or an award left, and replace the city's record when anything is kept.
    pub fn reconcile_city(&mut self, city: &str, extracted: Vec<Pizzeria>) -> CityOutcome {
        let mut outcome = CityOutcome::default();
        let mut kept = Vec::with_capacity(extracted.len());

        for mut pizzeria in extracted {
            let name = pizzeria.name.clone();
            pizzeria.locations.retain(|loc| match self.tracker.claim(city, &name, loc) {
                Claim::Foreign => {
                    logd!("{city}: {name} at ({}, {}) already recorded elsewhere", loc.lat, loc.lng);
                    outcome.duplicates_skipped += 1;
                    false
                }
                Claim::New | Claim::Own => true,
            });
            if pizzeria.is_worth_keeping() {
                outcome.locations += pizzeria.locations.len();
                kept.push(pizzeria);
            }
        }

        outcome.pizzerias = kept.len();
        self.duplicates_skipped += outcome.duplicates_skipped;
        if !kept.is_empty() {
            self.dataset.insert(city, CityRecord { pizzerias: kept });
            outcome.written = true;
        }
        outcome
    }

    pub fn dataset(&self) -> &CityDataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> CityDataset {
        self.dataset
    }

    pub fn tracker(&self) -> &LocationTracker {
        &self.tracker
    }

    /// Cross-city duplicates dropped since construction.
    pub fn duplicates_skipped(&self) -> usize {
        self.duplicates_skipped
    }
}
