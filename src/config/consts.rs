// src/config/consts.rs

// Site
pub const BASE_URL: &str = "https://www.50toppizza.it";
pub const CATALOG_PATH: &str = "cerca/";
pub const SEARCH_PARAM: &str = "s";
pub const CITY_SELECT_ID: &str = "comuneSelect2";
pub const DETAIL_PATH_MARKER: &str = "/referenza/";
pub const MAPS_DIR_MARKER: &str = "google.com/maps/dir";
pub const AWARD_BRAND: &str = "50 Top";

// Italian capital: the site lists it as "Roma", names often end in "Rome"
pub const CAPITAL_IT: &str = "Roma";
pub const CAPITAL_EN: &str = "Rome";

// Net
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; PizzeriaMapBot/1.0; Educational/Research Purpose)";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const REQUEST_PAUSE_MS: u64 = 500; // be polite

// Local store
pub const DEFAULT_DATA_DIR: &str = "public/data";
pub const DATASET_FILE: &str = "pizzeria_by_city.json";
pub const GEOJSON_FILE: &str = "pizzeria_locations.geojson";
pub const LEDGER_FILE: &str = "scraping_progress.json";
pub const CATALOG_FILE: &str = "all_cities.json";
pub const LEDGER_VERSION: &str = "1.0";

// Settings
pub const SETTINGS_FILE_STEM: &str = "pizza_scrape";
pub const ENV_PREFIX: &str = "PIZZA_SCRAPE";

// Extraction
pub const MAX_FALLBACK_ADDRESS_CHARS: usize = 200;
pub const MIN_LINK_TEXT_CHARS: usize = 3;
