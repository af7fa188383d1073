//! Sharded JSON storage.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//!   products/
//!     <s1>/
//!       <s2>/
//!         VRF-XXXX-XXXX-XXXX/
//!           product.json
//!   reports/
//!     <report-uuid>.json
//!   scans/
//!     <scan-uuid>.json
//! ```
//!
//! where `s1` and `s2` are the first two pairs of identifier body characters (see
//! [`VerificationId::sharded_dir`]).
//!
//! A new `product.json` is written in full to a private staging file and then published with a
//! hard link. The link fails if the name is taken, so insert-if-absent holds across processes
//! sharing the directory, and readers never observe a partly written document. Updates (scan
//! counts, status) rewrite the document through a temporary file and a rename, serialised by an
//! in-process lock.

use super::{ProductCatalog, ReportStore, ScanLog};
use crate::constants::PRODUCT_JSON_FILENAME;
use crate::product::{Product, ProductStatus};
use crate::report::CounterfeitReport;
use crate::scan::ScanRecord;
use crate::{CoreError, CoreResult};
use qb_verification_id::VerificationId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

#[derive(Debug)]
pub struct FileStore {
    products_dir: PathBuf,
    reports_dir: PathBuf,
    scans_dir: PathBuf,
    update_lock: Mutex<()>,
}

impl FileStore {
    /// Open (creating if needed) the product, report and scan directories.
    pub fn open(
        products_dir: PathBuf,
        reports_dir: PathBuf,
        scans_dir: PathBuf,
    ) -> CoreResult<Self> {
        for dir in [&products_dir, &reports_dir, &scans_dir] {
            fs::create_dir_all(dir).map_err(CoreError::StorageDirCreation)?;
        }

        Ok(Self {
            products_dir,
            reports_dir,
            scans_dir,
            update_lock: Mutex::new(()),
        })
    }

    fn product_path(&self, id: &VerificationId) -> PathBuf {
        id.sharded_dir(&self.products_dir).join(PRODUCT_JSON_FILENAME)
    }

    fn read_product(path: &Path) -> CoreResult<Option<Product>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CoreError::FileRead(e)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(CoreError::Deserialization)
    }

    /// Write `contents` to a file that must not exist yet, flushed to disk.
    fn write_new_file(path: &Path, contents: &[u8]) -> CoreResult<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(CoreError::FileWrite)?;
        file.write_all(contents)
            .and_then(|()| file.sync_all())
            .map_err(CoreError::FileWrite)
    }

    /// Remove a staging file, logging rather than failing if it cannot be removed.
    fn discard(path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("failed to remove staging file: {} - {}", path.display(), e),
        }
    }

    /// Replace `path` with `product` via a sibling temporary file.
    fn write_product(path: &Path, product: &Product) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(product).map_err(CoreError::Serialization)?;
        let tmp = path.with_extension("json.tmp");
        let written = fs::write(&tmp, json)
            .and_then(|()| fs::rename(&tmp, path))
            .map_err(CoreError::FileWrite);
        if written.is_err() {
            Self::discard(&tmp);
        }
        written
    }

    fn update_product<F>(&self, id: &VerificationId, update: F) -> CoreResult<Option<Product>>
    where
        F: FnOnce(&mut Product),
    {
        let _guard = self.update_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let path = self.product_path(id);
        let Some(mut product) = Self::read_product(&path)? else {
            return Ok(None);
        };
        update(&mut product);
        Self::write_product(&path, &product)?;
        Ok(Some(product))
    }

    /// Paths of every `product.json` under the shard tree.
    fn product_files(&self) -> Vec<PathBuf> {
        fn subdirs(dir: &Path) -> Vec<PathBuf> {
            match fs::read_dir(dir) {
                Ok(it) => it
                    .flatten()
                    .map(|entry| entry.path())
                    .filter(|path| path.is_dir())
                    .collect(),
                Err(_) => Vec::new(),
            }
        }

        subdirs(&self.products_dir)
            .iter()
            .flat_map(|s1| subdirs(s1))
            .flat_map(|s2| subdirs(&s2))
            .map(|id_dir| id_dir.join(PRODUCT_JSON_FILENAME))
            .filter(|path| path.is_file())
            .collect()
    }

    /// Store `record` as `<dir>/<id>.json`.
    fn write_record<T: Serialize>(dir: &Path, id: Uuid, record: &T) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(record).map_err(CoreError::Serialization)?;
        fs::write(dir.join(format!("{id}.json")), json).map_err(CoreError::FileWrite)
    }

    /// Every parseable `*.json` record in `dir`. Unreadable files are skipped with a warning.
    fn read_records<T: DeserializeOwned>(dir: &Path, kind: &str) -> CoreResult<Vec<T>> {
        let entries = fs::read_dir(dir).map_err(CoreError::FileRead)?;

        let mut records = Vec::new();
        for path in entries.flatten().map(|entry| entry.path()) {
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(CoreError::FileRead)
                .and_then(|contents| {
                    serde_json::from_str::<T>(&contents).map_err(CoreError::Deserialization)
                });
            match parsed {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("failed to read {}: {} - {}", kind, path.display(), e),
            }
        }
        Ok(records)
    }
}

impl ProductCatalog for FileStore {
    fn insert_if_absent(&self, product: Product) -> CoreResult<Product> {
        let path = self.product_path(&product.verification_id);
        let dir = id_dir(&path)?;
        fs::create_dir_all(dir).map_err(CoreError::StorageDirCreation)?;

        let json = serde_json::to_string_pretty(&product).map_err(CoreError::Serialization)?;
        let staged = dir.join(format!("{PRODUCT_JSON_FILENAME}.{}.tmp", Uuid::new_v4()));

        let published = Self::write_new_file(&staged, json.as_bytes()).and_then(|()| {
            match fs::hard_link(&staged, &path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(
                    CoreError::DuplicateVerificationId(product.verification_id.clone()),
                ),
                Err(e) => Err(CoreError::FileWrite(e)),
            }
        });
        Self::discard(&staged);

        published.map(|()| product)
    }

    fn get(&self, id: &VerificationId) -> CoreResult<Option<Product>> {
        Self::read_product(&self.product_path(id))
    }

    fn record_scan(&self, id: &VerificationId) -> CoreResult<Option<Product>> {
        self.update_product(id, |product| {
            product.scan_count = product.scan_count.saturating_add(1);
        })
    }

    fn set_status(&self, id: &VerificationId, status: ProductStatus) -> CoreResult<Product> {
        self.update_product(id, |product| product.status = status)?
            .ok_or_else(|| CoreError::ProductNotFound(id.clone()))
    }

    fn list_products(&self) -> CoreResult<Vec<Product>> {
        let mut products = Vec::new();
        for path in self.product_files() {
            match Self::read_product(&path) {
                Ok(Some(product)) => products.push(product),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("failed to read product: {} - {}", path.display(), e);
                }
            }
        }
        products.sort_by(|a, b| a.verification_id.cmp(&b.verification_id));
        Ok(products)
    }
}

/// The per-identifier directory holding `product.json`.
fn id_dir(product_path: &Path) -> CoreResult<&Path> {
    product_path.parent().ok_or_else(|| {
        CoreError::StorageDirCreation(std::io::Error::new(
            ErrorKind::InvalidInput,
            format!("no parent directory for {}", product_path.display()),
        ))
    })
}

impl ReportStore for FileStore {
    fn submit(&self, report: CounterfeitReport) -> CoreResult<()> {
        Self::write_record(&self.reports_dir, report.id, &report)
    }

    fn list_reports(&self) -> CoreResult<Vec<CounterfeitReport>> {
        let mut reports: Vec<CounterfeitReport> = Self::read_records(&self.reports_dir, "report")?;
        reports.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
        Ok(reports)
    }
}

impl ScanLog for FileStore {
    fn append(&self, record: ScanRecord) -> CoreResult<()> {
        Self::write_record(&self.scans_dir, record.id, &record)
    }

    fn list_scans(&self) -> CoreResult<Vec<ScanRecord>> {
        let mut scans: Vec<ScanRecord> = Self::read_records(&self.scans_dir, "scan")?;
        scans.sort_by(|a, b| b.scanned_at.cmp(&a.scanned_at));
        Ok(scans)
    }
}
