// src/specs/details.rs
//! Scraping *spec* for a pizzeria detail page (`/referenza/<slug>/`).
//!
//! Parses the page once and hands the tree to the two rule families:
//! `awards` (prose over chrome-free text) and `locations` (map links, then
//! inline script literals). Either list may come back empty; that is not an
//! error. Fetch failures are the caller's business (`scrape::Crawler` treats
//! them as "no details").

use scraper::Html;

use crate::model::Details;

use super::{awards, locations};

pub fn extract(doc: &str) -> Details {
    let html = Html::parse_document(doc);
    Details {
        locations: locations::from_page(&html),
        awards: awards::from_page(&html),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Award, Location};

    const PAGE: &str = r#"
        <html><body class="single has-sidebar">
          <header class="site-header"><a href="/">1° 50 Top Pizza 2099</a></header>
          <article>
            <h1>Pizzeria Da Michele</h1>
            <p>1° 50 Top Pizza Italia 2024</p>
            <p>50 Top Pizza Italia 2024</p>
            <p>50 Top Pizza Europa 2023 - Pizzeria dell'anno</p>
            <div class="sede">Via Cesare Sersale 1, Napoli
              <a href="https://www.google.com/maps/dir/?api=1&destination=40.8497,14.2633">Indicazioni</a>
            </div>
          </article>
          <script>var m = [{lat: 41.9, lng: 12.5, address: "Via Flaminia 10, Roma"}];</script>
          <footer>50 Top Pizza 2024 © tutti i diritti</footer>
        </body></html>
    "#;

    #[test]
    fn detail_page_yields_awards_and_locations() {
        let d = extract(PAGE);
        assert_eq!(
            d.awards,
            vec![
                Award::ranked(1, "50 Top Pizza Italia 2024"),
                Award::unranked("50 Top Pizza Europa 2023 - Pizzeria dell'anno"),
            ]
        );
        assert_eq!(d.locations.len(), 2);
        assert_eq!(d.locations[0].address.as_deref(), Some("Via Cesare Sersale 1, Napoli Indicazioni"));
        assert_eq!(d.locations[1], Location::new(Some(s!("Via Flaminia 10, Roma")), 41.9, 12.5));
    }

    #[test]
    fn bare_page_is_empty_not_an_error() {
        assert_eq!(extract("<html><body><p>Chiuso per ferie</p></body></html>"), Details::default());
        assert_eq!(extract(""), Details::default());
    }
}
