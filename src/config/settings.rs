// src/config/settings.rs
//
// Runtime settings: consts defaults, then `pizza_scrape.toml` (optional),
// then `PIZZA_SCRAPE_*` environment variables.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub user_agent: String,
    pub request_pause_ms: u64,
    pub timeout_secs: u64,
    pub data_dir: PathBuf,
    pub mirror_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: s!(BASE_URL),
            user_agent: s!(USER_AGENT),
            request_pause_ms: REQUEST_PAUSE_MS,
            timeout_secs: REQUEST_TIMEOUT_SECS,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            mirror_dir: None,
        }
    }
}

impl Settings {
    /// `explicit` must exist when given; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) => File::from(path).required(true),
            None => File::with_name(SETTINGS_FILE_STEM).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }
}
