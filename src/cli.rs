// src/cli.rs
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use dialoguer::{Confirm, theme::ColorfulTheme};

use crate::{
    config::{
        options::{CitySelector, NetOptions, ScrapeOptions, StoreOptions},
        settings::Settings,
    },
    core::{
        CancelToken,
        net::{HttpSource, SiteUrls},
    },
    ledger::{CityStatus, ProgressLedger},
    logging,
    progress::Progress,
    scrape::{self, Crawler, RunSummary},
    store::{JsonStore, Store},
};

/// How many names the listing commands print before summarising the rest.
const LIST_LIMIT: usize = 20;

/// Scrape pizzeria locations and awards from 50toppizza.it, city by city.
#[derive(Debug, Parser)]
#[command(name = "pizza_scrape", version, about)]
pub struct Args {
    /// City names to scrape (e.g. Roma Napoli), or "all".
    pub cities: Vec<String>,

    /// Print the site's city list and exit.
    #[arg(long)]
    pub list_cities: bool,

    /// Fetch the city list and save it as all_cities.json.
    #[arg(long)]
    pub fetch_cities: bool,

    /// Only scrape cities the progress ledger does not mark scraped.
    #[arg(long)]
    pub resume: bool,

    /// Print progress ledger stats and pending cities.
    #[arg(long)]
    pub status: bool,

    /// Mark every city present in the saved dataset as scraped.
    #[arg(long)]
    pub sync: bool,

    /// Forget all scraping progress (asks first).
    #[arg(long)]
    pub reset: bool,

    /// Don't ask before --reset.
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Settings file (default: ./pizza_scrape.toml if present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append log lines to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    run_with(Args::parse())
}

pub fn run_with(args: Args) -> Result<()> {
    logging::init(args.log_file.as_deref()).wrap_err("could not open the log file")?;
    let settings = Settings::load(args.config.as_deref()).wrap_err("could not load settings")?;
    let store = JsonStore::new(&StoreOptions::from(&settings));

    if args.reset {
        return reset(&store, args.yes);
    }
    if args.status {
        print_status(&ProgressLedger::load(&store));
        return Ok(());
    }
    if args.sync {
        let ledger = scrape::sync_ledger(&store)?;
        print_status(&ledger);
        return Ok(());
    }

    let net = NetOptions::from(&settings);
    let source = HttpSource::new(&net)?;
    let site = SiteUrls::new(&net.base_url)?;
    let cancel = CancelToken::new();
    let crawler = Crawler::new(&source, &store, site)
        .with_pause(net.pause)
        .with_cancel(cancel.clone());

    if args.list_cities {
        let cities = crawler.fetch_catalog()?;
        println!("\n{} cities available:\n", cities.len());
        print_names(cities.iter().map(|c| c.name.as_str()), cities.len());
        return Ok(());
    }
    if args.fetch_cities {
        let cities = crawler.fetch_and_save_catalog()?;
        println!("Saved {} cities to {}", cities.len(), store.data_dir().display());
        return Ok(());
    }
    if args.cities.is_empty() && !args.resume {
        println!("Nothing to do. Examples:");
        println!("  pizza_scrape Roma Napoli");
        println!("  pizza_scrape all");
        println!("  pizza_scrape --resume");
        println!("  pizza_scrape --list-cities");
        return Ok(());
    }

    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        if !handler_token.is_cancelled() {
            eprintln!("\nInterrupt received, stopping after the current page…");
        }
        handler_token.cancel();
    })
    .wrap_err("could not install the Ctrl-C handler")?;

    let opts = ScrapeOptions { cities: CitySelector::from_args(&args.cities), resume: args.resume };
    let mut console = ConsoleProgress::default();
    let summary = crawler.run(&opts, Some(&mut console))?;
    print_summary(&summary);
    Ok(())
}

fn reset(store: &dyn Store, yes: bool) -> Result<()> {
    let confirmed = yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Reset all scraping progress? This cannot be undone")
            .default(false)
            .interact()?;
    if !confirmed {
        println!("Reset cancelled.");
        return Ok(());
    }
    let ledger = scrape::reset_ledger(store)?;
    print_status(&ledger);
    Ok(())
}

fn print_names<'n>(names: impl Iterator<Item = &'n str>, total: usize) {
    for name in names.take(LIST_LIMIT) {
        println!("  - {name}");
    }
    if total > LIST_LIMIT {
        println!("  ... and {} more", total - LIST_LIMIT);
    }
}

fn print_status(ledger: &ProgressLedger) {
    let st = ledger.stats();
    println!("Scraping progress");
    println!("  cities:     {} ({} scraped, {} pending)", st.total_cities, st.scraped_cities, st.pending_cities);
    println!("  pizzerias:  {}", st.total_pizzerias);
    println!("  locations:  {}", st.total_locations);
    if let Some(at) = ledger.last_updated() {
        println!("  updated:    {}", at.format("%Y-%m-%d %H:%M:%S"));
    }

    let pending: Vec<&str> = ledger
        .cities()
        .filter(|(_, p)| p.status == CityStatus::Pending)
        .map(|(name, _)| name.as_str())
        .collect();
    if !pending.is_empty() {
        println!("\nPending:");
        print_names(pending.iter().copied(), pending.len());
    }
}

fn print_summary(s: &RunSummary) {
    let rule = "=".repeat(60);
    println!("\n{rule}");
    println!("{}", if s.interrupted { "Interrupted" } else { "Complete!" });
    println!("Cities processed:   {}/{}", s.cities_processed, s.cities_selected);
    if !s.cities_failed.is_empty() {
        println!("Cities failed:      {} ({})", s.cities_failed.len(), s.cities_failed.join(", "));
    }
    println!("Kept this run:      {} pizzerias, {} locations", s.pizzerias_kept, s.locations_kept);
    println!("Duplicates skipped: {}", s.duplicates_skipped);
    if s.details_failed > 0 {
        println!("Detail pages lost:  {}", s.details_failed);
    }
    println!(
        "Dataset:            {} cities, {} pizzerias, {} locations",
        s.dataset_cities, s.dataset_pizzerias, s.dataset_locations
    );
    println!("{rule}");
}

/// Prints one line per city and per pizzeria to stdout.
#[derive(Default)]
struct ConsoleProgress {
    total: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total_cities: usize) {
        self.total = total_cities;
        println!("Scraping {total_cities} cities");
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn city_started(&mut self, index: usize, city: &str) {
        println!("\n[{}/{}] {city}", index + 1, self.total);
    }

    fn pizzeria_done(&mut self, index: usize, total: usize, name: &str, locations: Option<usize>) {
        match locations {
            Some(n) => println!("    [{}/{total}] {name}: {n} location(s)", index + 1),
            None => println!("    [{}/{total}] {name}: no details", index + 1),
        }
    }

    fn city_done(&mut self, _city: &str, pizzerias: usize, locations: usize) {
        println!("    ✓ {pizzerias} pizzerias, {locations} locations");
    }
}
