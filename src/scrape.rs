// src/scrape.rs
//
// The crawl loop: catalog → per-city search → per-pizzeria details → reconcile
// → persist. Strictly sequential, with a pause after every fetch. The dataset
// and the ledger are written after every city, so disk is never more than one
// city behind memory.

use std::thread;
use std::time::Duration;

use crate::{
    config::options::{CitySelector, ScrapeOptions},
    core::{
        CancelToken,
        net::{PageSource, SiteUrls},
    },
    error::{CrawlError, FetchError, StoreError},
    ledger::ProgressLedger,
    model::{City, Details, Pizzeria, PizzeriaLink},
    progress::Progress,
    reconcile::Reconciler,
    specs,
    store::{self, Store},
};

/// What a run did. Dataset totals are for the whole dataset, not just this run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cities_selected: usize,
    pub cities_processed: usize,
    /// Search failed or the dataset could not be saved; these stay pending.
    pub cities_failed: Vec<String>,
    pub pizzerias_kept: usize,
    pub locations_kept: usize,
    pub duplicates_skipped: usize,
    pub details_failed: usize,
    pub dataset_cities: usize,
    pub dataset_pizzerias: usize,
    pub dataset_locations: usize,
    pub interrupted: bool,
}

pub struct Crawler<'a> {
    source: &'a dyn PageSource,
    store: &'a dyn Store,
    site: SiteUrls,
    pause: Duration,
    cancel: CancelToken,
}

impl<'a> Crawler<'a> {
    pub fn new(source: &'a dyn PageSource, store: &'a dyn Store, site: SiteUrls) -> Self {
        Self { source, store, site, pause: Duration::ZERO, cancel: CancelToken::new() }
    }

    /// Sleep this long after every fetch, failed or not.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        logd!("GET {url}");
        let res = self.source.fetch(url);
        if !self.pause.is_zero() {
            thread::sleep(self.pause);
        }
        res
    }

    /// Every city of the site's dropdown. Zero cities is an error: nothing
    /// downstream makes sense without them.
    pub fn fetch_catalog(&self) -> Result<Vec<City>, CrawlError> {
        let body = self.fetch(&self.site.catalog())?;
        let cities = specs::cities::parse(&body);
        if cities.is_empty() {
            return Err(CrawlError::EmptyCatalog);
        }
        logf!("Catalog: {} cities", cities.len());
        Ok(cities)
    }

    /// Fetch the catalog and keep a copy next to the dataset.
    pub fn fetch_and_save_catalog(&self) -> Result<Vec<City>, CrawlError> {
        let cities = self.fetch_catalog()?;
        self.store.save_catalog(&cities)?;
        Ok(cities)
    }

    fn search(&self, city: &str) -> Result<Vec<PizzeriaLink>, FetchError> {
        let body = self.fetch(&self.site.search(city))?;
        Ok(specs::pizzerias::parse(&body, city, &self.site))
    }

    /// `None` when the page can't be fetched; the pizzeria is skipped.
    fn details(&self, city: &str, link: &PizzeriaLink) -> Option<Details> {
        match self.fetch(&link.url) {
            Ok(body) => Some(specs::details::extract(&body)),
            Err(e) => {
                logw!("{city}: no details for {} ({}): {e}", link.name, link.url);
                None
            }
        }
    }

    /// Crawl the selected cities. `progress` is finished on every path,
    /// including a fatal catalog or selection error.
    pub fn run(
        &self,
        opts: &ScrapeOptions,
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<RunSummary, CrawlError> {
        let result = self.crawl(opts, &mut progress);
        if let Some(p) = progress {
            p.finish();
        }
        result
    }

    fn crawl(
        &self,
        opts: &ScrapeOptions,
        progress: &mut Option<&mut dyn Progress>,
    ) -> Result<RunSummary, CrawlError> {
        let catalog = self.fetch_catalog()?;
        let selected = select_cities(&catalog, &opts.cities)?;

        let mut ledger = ProgressLedger::load(self.store);
        let mut reconciler = Reconciler::new(store::load_dataset_or_empty(self.store));
        logf!(
            "Loaded {} cities / {} pizzerias from the existing dataset",
            reconciler.dataset().len(),
            reconciler.dataset().pizzeria_count()
        );

        let todo: Vec<&City> = if opts.resume {
            catalog.iter().for_each(|c| ledger.mark_pending(&c.name));
            if let Err(e) = ledger.persist(self.store) {
                loge!("Could not save the progress ledger: {e}");
            }
            ledger.pending_cities(&selected)
        } else {
            selected.iter().for_each(|c| ledger.mark_pending(&c.name));
            selected.iter().collect()
        };

        let mut summary = RunSummary { cities_selected: todo.len(), ..RunSummary::default() };
        if let Some(p) = progress.as_deref_mut() {
            p.begin(todo.len());
        }
        if todo.is_empty() {
            logf!("Nothing to do: every selected city is already scraped");
            if let Some(p) = progress.as_deref_mut() {
                p.log("Every selected city is already scraped");
            }
        }

        for (i, city) in todo.iter().enumerate() {
            if self.cancel.is_cancelled() {
                summary.interrupted = true;
                break;
            }
            let name = city.name.as_str();
            logf!("[{}/{}] {name}", i + 1, todo.len());
            if let Some(p) = progress.as_deref_mut() {
                p.city_started(i, name);
            }

            let links = match self.search(name) {
                Ok(links) => links,
                Err(e) => {
                    logw!("{name}: search failed, city left pending: {e}");
                    if let Some(p) = progress.as_deref_mut() {
                        p.log(&format!("{name}: search failed"));
                    }
                    summary.cities_failed.push(s!(name));
                    continue;
                }
            };
            logf!("{name}: {} pizzerias found", links.len());

            let total = links.len();
            let mut extracted: Vec<Pizzeria> = Vec::with_capacity(total);
            for (j, link) in links.into_iter().enumerate() {
                if self.cancel.is_cancelled() {
                    summary.interrupted = true;
                    break;
                }
                let details = self.details(name, &link);
                if let Some(p) = progress.as_deref_mut() {
                    p.pizzeria_done(j, total, &link.name, details.as_ref().map(|d| d.locations.len()));
                }
                match details {
                    Some(d) => extracted.push(Pizzeria::from_parts(link, d)),
                    None => summary.details_failed += 1,
                }
            }
            if summary.interrupted {
                logw!("{name}: interrupted, city left pending");
                break;
            }

            let outcome = reconciler.reconcile_city(name, extracted);
            if outcome.written {
                if let Err(e) = self.store.save_dataset(reconciler.dataset()) {
                    loge!("{name}: could not save the dataset, city left pending: {e}");
                    summary.cities_failed.push(s!(name));
                    continue;
                }
            }
            if let Err(e) = ledger.mark_scraped(self.store, name, outcome.pizzerias, outcome.locations) {
                loge!("{name}: could not save the progress ledger: {e}");
            }

            logf!(
                "{name}: kept {} pizzerias, {} locations ({} cross-city duplicates skipped)",
                outcome.pizzerias,
                outcome.locations,
                outcome.duplicates_skipped
            );
            if let Some(p) = progress.as_deref_mut() {
                p.city_done(name, outcome.pizzerias, outcome.locations);
            }
            summary.cities_processed += 1;
            summary.pizzerias_kept += outcome.pizzerias;
            summary.locations_kept += outcome.locations;
        }

        if summary.interrupted {
            if let Err(e) = ledger.persist(self.store) {
                loge!("Could not save the progress ledger: {e}");
            }
        }

        summary.duplicates_skipped = reconciler.duplicates_skipped();
        let dataset = reconciler.dataset();
        summary.dataset_cities = dataset.len();
        summary.dataset_pizzerias = dataset.pizzeria_count();
        summary.dataset_locations = dataset.location_count();
        Ok(summary)
    }
}

/// Catalog cities picked by `sel`, in catalog order. Names match ignoring
/// case; unknown names are warned about and fail the run only if none match.
pub fn select_cities(catalog: &[City], sel: &CitySelector) -> Result<Vec<City>, CrawlError> {
    let wanted = match sel {
        CitySelector::All => return Ok(catalog.to_vec()),
        CitySelector::Named(names) => names,
    };
    let same = |city: &City, name: &str| city.name.to_lowercase() == name.trim().to_lowercase();

    let unknown: Vec<String> = wanted
        .iter()
        .filter(|name| !catalog.iter().any(|c| same(c, name)))
        .cloned()
        .collect();
    let picked: Vec<City> = catalog
        .iter()
        .filter(|c| wanted.iter().any(|name| same(c, name)))
        .cloned()
        .collect();

    if picked.is_empty() {
        return Err(CrawlError::UnknownCities(unknown));
    }
    for name in &unknown {
        logw!("City {name:?} is not in the catalog, skipped");
    }
    Ok(picked)
}

/// Bring the ledger in line with the saved dataset.
pub fn sync_ledger(store: &dyn Store) -> Result<ProgressLedger, StoreError> {
    let dataset = store::load_dataset_or_empty(store);
    let mut ledger = ProgressLedger::load(store);
    let synced = ledger.sync(store, &dataset)?;
    logf!("Synced {synced} cities from the dataset");
    Ok(ledger)
}

/// Forget all progress. Irreversible.
pub fn reset_ledger(store: &dyn Store) -> Result<ProgressLedger, StoreError> {
    let mut ledger = ProgressLedger::new();
    ledger.reset(store)?;
    logf!("Progress ledger reset");
    Ok(ledger)
}
