// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::settings::Settings;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CitySelector {
    All,
    Named(Vec<String>),
}

impl CitySelector {
    /// `["all"]` (any case, anywhere in the list) means every city.
    pub fn from_args(names: &[String]) -> Self {
        if names.is_empty() || names.iter().any(|n| n.eq_ignore_ascii_case("all")) {
            CitySelector::All
        } else {
            CitySelector::Named(names.to_vec())
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub cities: CitySelector,
    /// Skip cities the ledger already marks scraped.
    pub resume: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            cities: CitySelector::All,
            resume: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetOptions {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Pause after every fetch, success or not.
    pub pause: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreOptions {
    pub data_dir: PathBuf,
    /// Second copy of the published files (dataset, geojson, catalog).
    pub mirror_dir: Option<PathBuf>,
}

impl From<&Settings> for NetOptions {
    fn from(s: &Settings) -> Self {
        Self {
            base_url: s.base_url.clone(),
            user_agent: s.user_agent.clone(),
            timeout: Duration::from_secs(s.timeout_secs),
            pause: Duration::from_millis(s.request_pause_ms),
        }
    }
}

impl From<&Settings> for StoreOptions {
    fn from(s: &Settings) -> Self {
        Self {
            data_dir: s.data_dir.clone(),
            mirror_dir: s.mirror_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_keyword_selects_every_city() {
        let args = vec![s!("Roma"), s!("ALL")];
        assert_eq!(CitySelector::from_args(&args), CitySelector::All);
        assert_eq!(CitySelector::from_args(&[]), CitySelector::All);
    }

    #[test]
    fn named_cities_keep_their_order() {
        let args = vec![s!("Napoli"), s!("Roma")];
        assert_eq!(
            CitySelector::from_args(&args),
            CitySelector::Named(vec![s!("Napoli"), s!("Roma")])
        );
    }
}
