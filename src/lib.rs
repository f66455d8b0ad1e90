// src/lib.rs
// #![allow(dead_code)]

#[macro_use]
pub mod macros;
#[macro_use]
pub mod logging;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod specs;

pub mod error;
pub mod geojson;
pub mod ledger;
pub mod model;
pub mod progress;
pub mod reconcile;
pub mod scrape;
pub mod store;
