// src/core/net.rs
//
// Page fetching. The run loop only sees `PageSource`; `HttpSource` is the real
// network implementation, tests plug in canned pages.

use reqwest::blocking::Client;
use url::Url;

use crate::config::consts::{CATALOG_PATH, SEARCH_PARAM};
use crate::config::options::NetOptions;
use crate::error::{CrawlError, FetchError};

pub trait PageSource {
    /// Raw body of `url`.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(opts: &NetOptions) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(opts.user_agent.clone())
            .timeout(opts.timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport { url: s!(url), source };

        let resp = self.client.get(url).send().map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: s!(url), status: status.as_u16() });
        }
        resp.text().map_err(transport)
    }
}

/// URL layout of the directory site.
#[derive(Clone, Debug)]
pub struct SiteUrls {
    base: Url,
}

impl SiteUrls {
    pub fn new(base_url: &str) -> Result<Self, CrawlError> {
        let base = Url::parse(base_url).map_err(|e| CrawlError::BaseUrl(s!(base_url), e))?;
        Ok(Self { base })
    }

    /// Landing page holding the city dropdown.
    pub fn catalog(&self) -> String {
        self.resolve(CATALOG_PATH).unwrap_or_else(|| self.base.to_string())
    }

    /// Full-text search for one city: `{base}/?s=<city>`.
    pub fn search(&self, city: &str) -> String {
        let mut url = self.base.clone();
        url.set_path("/");
        url.set_fragment(None);
        url.query_pairs_mut().clear().append_pair(SEARCH_PARAM, city);
        url.to_string()
    }

    /// Absolute form of a (possibly relative) link found on a page.
    pub fn resolve(&self, href: &str) -> Option<String> {
        self.base.join(href).ok().map(|u| u.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_encodes_the_city() {
        let site = SiteUrls::new("https://www.50toppizza.it").unwrap();
        assert_eq!(site.search("Roma"), "https://www.50toppizza.it/?s=Roma");
        assert_eq!(site.search("Reggio Emilia"), "https://www.50toppizza.it/?s=Reggio+Emilia");
    }

    #[test]
    fn catalog_and_relative_links() {
        let site = SiteUrls::new("https://www.50toppizza.it").unwrap();
        assert_eq!(site.catalog(), "https://www.50toppizza.it/cerca/");
        assert_eq!(
            site.resolve("/referenza/seu/").as_deref(),
            Some("https://www.50toppizza.it/referenza/seu/")
        );
        assert_eq!(
            site.resolve("https://other.example/referenza/x").as_deref(),
            Some("https://other.example/referenza/x")
        );
    }

    #[test]
    fn bad_base_url_is_reported() {
        assert!(matches!(SiteUrls::new("not a url"), Err(CrawlError::BaseUrl(..))));
    }
}
