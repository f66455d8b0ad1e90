// src/store.rs
//
// Persistence behind a small trait so the run loop can be driven against
// memory in tests. `JsonStore` is the real thing: whole-file JSON snapshots,
// each written to a temp file in the target directory and renamed over the old
// one, so a crash mid-write never leaves a half file behind.

use std::cell::{Cell, RefCell};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::config::consts::{CATALOG_FILE, DATASET_FILE, GEOJSON_FILE, LEDGER_FILE};
use crate::config::options::StoreOptions;
use crate::error::StoreError;
use crate::geojson;
use crate::ledger::ProgressLedger;
use crate::model::{City, CityDataset};

pub trait Store {
    /// `Ok(None)` when nothing was saved yet.
    fn load_dataset(&self) -> Result<Option<CityDataset>, StoreError>;
    /// Full snapshot; the map layer is regenerated alongside.
    fn save_dataset(&self, dataset: &CityDataset) -> Result<(), StoreError>;
    fn load_ledger(&self) -> Result<Option<ProgressLedger>, StoreError>;
    fn save_ledger(&self, ledger: &ProgressLedger) -> Result<(), StoreError>;
    fn save_catalog(&self, cities: &[City]) -> Result<(), StoreError>;
}

/// Saved dataset, or an empty one if there is none or it can't be read.
pub fn load_dataset_or_empty(store: &dyn Store) -> CityDataset {
    match store.load_dataset() {
        Ok(Some(dataset)) => dataset,
        Ok(None) => CityDataset::new(),
        Err(e) => {
            logw!("Existing dataset unreadable, starting from an empty one: {e}");
            CityDataset::new()
        }
    }
}

/* ---------------- JSON files on disk ---------------- */

pub struct JsonStore {
    data_dir: PathBuf,
    mirror_dir: Option<PathBuf>,
}

impl JsonStore {
    pub fn new(opts: &StoreOptions) -> Self {
        Self { data_dir: opts.data_dir.clone(), mirror_dir: opts.mirror_dir.clone() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Data dir first, then the mirror if configured.
    fn published_dirs(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.data_dir.as_path()).chain(self.mirror_dir.as_deref())
    }

    fn publish<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        for dir in self.published_dirs() {
            write_json_atomic(&dir.join(file), value)?;
        }
        Ok(())
    }
}

impl Store for JsonStore {
    fn load_dataset(&self) -> Result<Option<CityDataset>, StoreError> {
        read_json(&self.data_dir.join(DATASET_FILE))
    }

    fn save_dataset(&self, dataset: &CityDataset) -> Result<(), StoreError> {
        self.publish(DATASET_FILE, dataset)?;
        self.publish(GEOJSON_FILE, &geojson::project(dataset))
    }

    fn load_ledger(&self) -> Result<Option<ProgressLedger>, StoreError> {
        read_json(&self.data_dir.join(LEDGER_FILE))
    }

    fn save_ledger(&self, ledger: &ProgressLedger) -> Result<(), StoreError> {
        write_json_atomic(&self.data_dir.join(LEDGER_FILE), ledger)
    }

    fn save_catalog(&self, cities: &[City]) -> Result<(), StoreError> {
        self.publish(CATALOG_FILE, cities)
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io { path: path.to_path_buf(), source }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_err(path)(e)),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })
}

/// Pretty JSON (UTF-8 kept as is) via temp file + rename in the same directory.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err(dir))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err(dir))?;
    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut w, value)
            .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;
        w.write_all(b"\n").map_err(io_err(path))?;
        w.flush().map_err(io_err(path))?;
    }
    tmp.persist(path).map_err(|e| io_err(path)(e.error))?;
    logd!("Wrote {}", path.display());
    Ok(())
}

/* ---------------- In-memory (tests, dry runs) ---------------- */

/// Keeps every snapshot as serialized JSON, so loads go through the same
/// decoding as files do.
#[derive(Default)]
pub struct MemoryStore {
    dataset: RefCell<Option<String>>,
    geojson: RefCell<Option<String>>,
    ledger: RefCell<Option<String>>,
    catalog: RefCell<Option<String>>,
    dataset_saves: Cell<usize>,
    fail_dataset_saves: Cell<bool>,
}

impl MemoryStore {
    /// Make every later `save_dataset` fail with an I/O error.
    pub fn fail_dataset_saves(&self, fail: bool) {
        self.fail_dataset_saves.set(fail);
    }

    pub fn put_ledger_json(&self, json: &str) {
        self.ledger.replace(Some(s!(json)));
    }

    pub fn dataset_saves(&self) -> usize {
        self.dataset_saves.get()
    }

    pub fn geojson(&self) -> Option<geojson::FeatureCollection> {
        self.geojson.borrow().as_deref().and_then(|j| serde_json::from_str(j).ok())
    }

    pub fn catalog(&self) -> Option<Vec<City>> {
        self.catalog.borrow().as_deref().and_then(|j| serde_json::from_str(j).ok())
    }

    fn decode<T: DeserializeOwned>(slot: &RefCell<Option<String>>, file: &str) -> Result<Option<T>, StoreError> {
        match slot.borrow().as_deref() {
            None => Ok(None),
            Some(json) => serde_json::from_str(json)
                .map(Some)
                .map_err(|source| StoreError::Json { path: PathBuf::from(file), source }),
        }
    }

    fn encode<T: Serialize + ?Sized>(slot: &RefCell<Option<String>>, file: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|source| StoreError::Json { path: PathBuf::from(file), source })?;
        slot.replace(Some(json));
        Ok(())
    }
}

impl Store for MemoryStore {
    fn load_dataset(&self) -> Result<Option<CityDataset>, StoreError> {
        Self::decode(&self.dataset, DATASET_FILE)
    }

    fn save_dataset(&self, dataset: &CityDataset) -> Result<(), StoreError> {
        if self.fail_dataset_saves.get() {
            return Err(StoreError::Io {
                path: PathBuf::from(DATASET_FILE),
                source: io::Error::other("disk full"),
            });
        }
        Self::encode(&self.dataset, DATASET_FILE, dataset)?;
        Self::encode(&self.geojson, GEOJSON_FILE, &geojson::project(dataset))?;
        self.dataset_saves.set(self.dataset_saves.get() + 1);
        Ok(())
    }

    fn load_ledger(&self) -> Result<Option<ProgressLedger>, StoreError> {
        Self::decode(&self.ledger, LEDGER_FILE)
    }

    fn save_ledger(&self, ledger: &ProgressLedger) -> Result<(), StoreError> {
        Self::encode(&self.ledger, LEDGER_FILE, ledger)
    }

    fn save_catalog(&self, cities: &[City]) -> Result<(), StoreError> {
        Self::encode(&self.catalog, CATALOG_FILE, cities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CityRecord, Location, Pizzeria};

    fn one_city() -> CityDataset {
        let mut d = CityDataset::new();
        d.insert(
            "Roma",
            CityRecord {
                pizzerias: vec![Pizzeria {
                    name: s!("Seu Pizza Illuminati"),
                    url: s!("https://www.50toppizza.it/referenza/seu-pizza-illuminati/"),
                    locations: vec![Location::new(Some(s!("Via Angelo Bargoni 10, Roma")), 41.8807, 12.4722)],
                    awards: vec![],
                }],
            },
        );
        d
    }

    #[test]
    fn dataset_and_map_layer_are_saved_together() {
        let store = MemoryStore::default();
        store.save_dataset(&one_city()).unwrap();
        assert_eq!(store.load_dataset().unwrap(), Some(one_city()));
        assert_eq!(store.geojson().unwrap().features.len(), 1);
        assert_eq!(store.dataset_saves(), 1);
    }

    #[test]
    fn corrupt_dataset_loads_as_empty() {
        let store = MemoryStore::default();
        store.dataset.replace(Some(s!("[1, 2")));
        assert!(store.load_dataset().is_err());
        assert!(load_dataset_or_empty(&store).is_empty());
    }

    #[test]
    fn failing_saves_report_the_file() {
        let store = MemoryStore::default();
        store.fail_dataset_saves(true);
        let err = store.save_dataset(&one_city()).unwrap_err();
        assert!(err.to_string().contains(DATASET_FILE));
    }
}
