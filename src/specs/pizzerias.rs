// src/specs/pizzerias.rs
//! Scraping *spec* for city search results.
//!
//! Purpose:
//! - Parse a **full-text search page** (`/?s=<city>`) and collect every link to a
//!   pizzeria detail page (`/referenza/<slug>/`) as `PizzeriaLink { name, url }`.
//!
//! Name precedence, first non-empty wins:
//! 1. `alt` of an `<img>` inside the link (result cards are image links);
//! 2. the link's visible text (at least three characters);
//! 3. the URL slug, title-cased.
//!
//! Result cards repeat the city in the title ("Seu Pizza Illuminati Roma"), so a
//! trailing city name is stripped; for the capital the English "Rome" too.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::config::consts::{CAPITAL_EN, CAPITAL_IT, DETAIL_PATH_MARKER, MIN_LINK_TEXT_CHARS};
use crate::core::html::element_text;
use crate::core::net::SiteUrls;
use crate::core::sanitize::{normalize_ws, slug_to_name, strip_suffix_word};
use crate::model::PizzeriaLink;

static LINKS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static IMAGES: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img[alt]").unwrap());
static DETAIL_HREF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/referenza/[^/?#]+/?").unwrap());

/// Detail links in document order, deduplicated by absolute URL.
pub fn parse(doc: &str, city: &str, site: &SiteUrls) -> Vec<PizzeriaLink> {
    let html = Html::parse_document(doc);
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for link in html.select(&LINKS) {
        let Some(href) = link.value().attr("href") else { continue };
        if !DETAIL_HREF.is_match(href) {
            continue;
        }
        let Some(url) = site.resolve(href.trim()) else { continue };
        if !seen.insert(url.clone()) {
            continue;
        }

        let name = resolve_name(link, href);
        if name.is_empty() {
            continue;
        }
        out.push(PizzeriaLink { name: strip_city(&name, city), url });
    }

    out
}

fn resolve_name(link: ElementRef<'_>, href: &str) -> String {
    let from_img = link
        .select(&IMAGES)
        .filter_map(|img| img.value().attr("alt"))
        .map(normalize_ws)
        .find(|alt| !alt.is_empty());
    if let Some(alt) = from_img {
        return alt;
    }

    let text = normalize_ws(&element_text(link));
    if text.chars().count() >= MIN_LINK_TEXT_CHARS {
        return text;
    }

    slug_to_name(slug_of(href))
}

/// Path segment after `/referenza/`, without slashes, query or fragment.
fn slug_of(href: &str) -> &str {
    let tail = href.rsplit(DETAIL_PATH_MARKER).next().unwrap_or(href);
    let tail = tail.split(['?', '#']).next().unwrap_or(tail);
    tail.trim_matches('/')
}

/// Drop a trailing city name ("… Napoli"); for the capital also "… Rome".
pub fn strip_city(name: &str, city: &str) -> String {
    if name.ends_with(city) {
        return strip_suffix_word(name, city).unwrap_or_else(|| s!(name));
    }
    if city == CAPITAL_IT {
        if let Some(stripped) = strip_suffix_word(name, CAPITAL_EN) {
            return stripped;
        }
    }
    s!(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteUrls {
        SiteUrls::new("https://www.50toppizza.it").unwrap()
    }

    #[test]
    fn name_precedence_and_url_dedup() {
        let doc = r#"
            <div class="results">
              <a href="/referenza/seu-pizza-illuminati/"><img src="s.jpg" alt="Seu Pizza Illuminati Roma"></a>
              <a href="https://www.50toppizza.it/referenza/seu-pizza-illuminati/">Seu Pizza Illuminati</a>
              <a href="/referenza/sbanco/">Sbanco</a>
              <a href="/referenza/pepe-in-grani/">»</a>
              <a href="/classifica/2024/">Classifica</a>
              <a href="/chi-siamo/">Chi siamo</a>
            </div>
        "#;
        let links = parse(doc, "Roma", &site());
        assert_eq!(links.len(), 3);

        assert_eq!(links[0].name, "Seu Pizza Illuminati");
        assert_eq!(links[0].url, "https://www.50toppizza.it/referenza/seu-pizza-illuminati/");
        assert_eq!(links[1].name, "Sbanco");
        // "»" is too short to be a name, fall back to the slug
        assert_eq!(links[2].name, "Pepe In Grani");
    }

    #[test]
    fn capital_alias_is_stripped() {
        assert_eq!(strip_city("Pinsere Rome", "Roma"), "Pinsere");
        assert_eq!(strip_city("Pinsere Rome", "Napoli"), "Pinsere Rome");
        assert_eq!(strip_city("Concettina ai Tre Santi Napoli", "Napoli"), "Concettina ai Tre Santi");
    }

    #[test]
    fn name_equal_to_city_is_kept() {
        assert_eq!(strip_city("Roma", "Roma"), "Roma");
    }

    #[test]
    fn page_without_detail_links_is_empty() {
        assert!(parse("<p>Nessun risultato</p>", "Roma", &site()).is_empty());
    }
}
