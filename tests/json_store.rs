// tests/json_store.rs
use std::fs;
use std::path::Path;

use pizza_scrape::config::consts::{CATALOG_FILE, DATASET_FILE, GEOJSON_FILE, LEDGER_FILE};
use pizza_scrape::config::options::StoreOptions;
use pizza_scrape::ledger::ProgressLedger;
use pizza_scrape::model::{City, CityDataset, CityRecord, Location, Pizzeria};
use pizza_scrape::reconcile::Reconciler;
use pizza_scrape::scrape;
use pizza_scrape::store::{self, JsonStore, Store};

fn json_store(dir: &Path, mirror: Option<&Path>) -> JsonStore {
    JsonStore::new(&StoreOptions {
        data_dir: dir.to_path_buf(),
        mirror_dir: mirror.map(Path::to_path_buf),
    })
}

fn napoli() -> CityDataset {
    let mut d = CityDataset::new();
    d.insert(
        "Napoli",
        CityRecord {
            pizzerias: vec![Pizzeria {
                name: "L'Antica Pizzeria da Michele".into(),
                url: "https://www.50toppizza.it/referenza/da-michele/".into(),
                locations: vec![Location::new(Some("Via Cesare Sersale 1, Napoli".into()), 40.8497, 14.2633)],
                awards: vec![],
            }],
        },
    );
    d
}

#[test]
fn dataset_round_trips_and_is_mirrored() {
    let data = tempfile::tempdir().unwrap();
    let mirror = tempfile::tempdir().unwrap();
    let store = json_store(&data.path().join("nested/data"), Some(mirror.path()));

    assert_eq!(store.load_dataset().unwrap(), None);
    store.save_dataset(&napoli()).unwrap();
    assert_eq!(store.load_dataset().unwrap(), Some(napoli()));

    for dir in [data.path().join("nested/data"), mirror.path().to_path_buf()] {
        let text = fs::read_to_string(dir.join(DATASET_FILE)).unwrap();
        assert!(text.contains("L'Antica Pizzeria da Michele"));
        assert!(dir.join(GEOJSON_FILE).is_file());
    }
    // Ledger stays private to the data dir.
    let mut ledger = ProgressLedger::new();
    ledger.mark_scraped(&store, "Napoli", 1, 1).unwrap();
    assert!(!mirror.path().join(LEDGER_FILE).exists());
}

#[test]
fn non_ascii_is_written_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let store = json_store(dir.path(), None);
    let cities = vec![City { name: "Forlì".into(), external_id: "forli".into() }];
    store.save_catalog(&cities).unwrap();

    let text = fs::read_to_string(dir.path().join(CATALOG_FILE)).unwrap();
    assert!(text.contains("\"Forlì\""));
    assert!(text.contains("\"value\": \"forli\""));
}

#[test]
fn corrupt_files_fall_back_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(LEDGER_FILE), "{\"version\": ").unwrap();
    fs::write(dir.path().join(DATASET_FILE), "not json at all").unwrap();
    let store = json_store(dir.path(), None);

    assert!(ProgressLedger::load(&store).is_empty());
    assert!(store.load_dataset().is_err());
    assert!(store::load_dataset_or_empty(&store).is_empty());
}

#[test]
fn sync_and_reset_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = json_store(dir.path(), None);
    store.save_dataset(&napoli()).unwrap();

    let ledger = scrape::sync_ledger(&store).unwrap();
    assert!(ledger.is_scraped("Napoli"));
    assert!(ProgressLedger::load(&store).is_scraped("Napoli"));

    scrape::reset_ledger(&store).unwrap();
    let reloaded = ProgressLedger::load(&store);
    assert!(reloaded.is_empty());
    assert_eq!(reloaded.stats().total_cities, 0);
    // The dataset itself is untouched by a ledger reset.
    assert_eq!(store.load_dataset().unwrap(), Some(napoli()));
}

#[test]
fn reloaded_coordinates_keep_their_exact_identity() {
    // Needs 17 significant digits; a fast float parser lands one ulp off.
    let lat: f64 = "40.668424524974165".parse().unwrap();
    let pizzeria = || Pizzeria {
        name: "Pizzeria X".into(),
        url: "https://www.50toppizza.it/referenza/pizzeria-x/".into(),
        locations: vec![Location::new(None, lat, 12.5)],
        awards: vec![],
    };

    let dir = tempfile::tempdir().unwrap();
    let store = json_store(dir.path(), None);
    let mut seed = Reconciler::new(CityDataset::new());
    seed.reconcile_city("Roma", vec![pizzeria()]);
    store.save_dataset(seed.dataset()).unwrap();

    let loaded = store.load_dataset().unwrap().unwrap();
    let reloaded = &loaded.get("Roma").unwrap().pizzerias[0].locations[0];
    assert_eq!(reloaded.lat.to_bits(), lat.to_bits());

    let mut r = Reconciler::new(loaded);
    let out = r.reconcile_city("Napoli", vec![pizzeria()]);
    assert_eq!(out.duplicates_skipped, 1);
    assert_eq!(out.pizzerias, 0);
    assert!(r.dataset().get("Napoli").is_none());
}
