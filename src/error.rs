// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Anything that stops a page from being fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures that make a whole run meaningless.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid base URL {0:?}: {1}")]
    BaseUrl(String, #[source] url::ParseError),

    #[error("could not fetch the city catalog: {0}")]
    Catalog(#[from] FetchError),

    #[error("the city catalog is empty (selection control missing?)")]
    EmptyCatalog,

    #[error("none of the requested cities exist in the catalog: {}", .0.join(", "))]
    UnknownCities(Vec<String>),

    #[error(transparent)]
    Store(#[from] StoreError),
}
