// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific parsers for the directory site. Each spec knows *where the
//! ground truth lives in one kind of page* and how to extract it tolerantly.
//!
//! ## What lives here
//! - **Pure parsing** of page bodies that were already fetched: the search
//!   landing page (`cities`), full-text search results (`pizzerias`) and the
//!   pizzeria detail page (`details`, built from `awards` and `locations`).
//! - **Rule precedence**: free-text extraction is expressed as ordered tables
//!   of named regex rules, so each rule can be exercised on its own.
//!
//! ## What does **not** live here
//! - **Networking and throttling** – `core::net` and the run loop in `scrape`.
//! - **Cross-city merging, keep/drop policy** – `reconcile`.
//! - **Persistence** – `store` and `ledger`.
//!
//! ## Typical call chain
//! ```text
//! scrape::Crawler → PageSource::fetch(url) → specs::<page>::parse(..)
//!                                         ↘ typed records (City, PizzeriaLink, Details)
//!                 reconcile::Reconciler (outside of specs)
//! ```
//!
//! ## Conventions & invariants
//! - Missing markup is **not an error**: an absent dropdown yields no cities, a
//!   page without awards yields an empty award list.
//! - Output order follows document order; dedup keeps the first occurrence.
//!
//! ## Testing notes
//! - Every spec is testable **offline** against small inline HTML fixtures.
pub mod awards;
pub mod cities;
pub mod details;
pub mod locations;
pub mod pizzerias;
