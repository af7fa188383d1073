//! Storage boundary for products, counterfeit reports and scan history.
//!
//! The catalog is the only place identifier uniqueness is enforced. Registration pairs every
//! freshly generated identifier with [`ProductCatalog::insert_if_absent`] and regenerates on
//! [`CoreError::DuplicateVerificationId`](crate::CoreError::DuplicateVerificationId).
//!
//! Two backends are provided:
//! - [`MemoryStore`]: lock-protected maps, for tests and throwaway runs
//! - [`FileStore`]: sharded JSON documents under the configured data directory

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::config::{CoreConfig, StorageBackend};
use crate::product::{Product, ProductStatus};
use crate::report::CounterfeitReport;
use crate::scan::ScanRecord;
use crate::CoreResult;
use qb_verification_id::VerificationId;
use std::sync::Arc;

pub trait ProductCatalog: Send + Sync {
    /// Insert `product` unless its identifier is already taken.
    ///
    /// Must be atomic: two concurrent inserts of the same identifier cannot both succeed, and a
    /// losing insert leaves the existing record untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateVerificationId`](crate::CoreError::DuplicateVerificationId)
    /// if the identifier exists.
    fn insert_if_absent(&self, product: Product) -> CoreResult<Product>;

    fn get(&self, id: &VerificationId) -> CoreResult<Option<Product>>;

    /// Increment the scan counter and return the updated product, or `None` if unregistered.
    fn record_scan(&self, id: &VerificationId) -> CoreResult<Option<Product>>;

    /// # Errors
    ///
    /// Returns [`CoreError::ProductNotFound`](crate::CoreError::ProductNotFound) if absent.
    fn set_status(&self, id: &VerificationId, status: ProductStatus) -> CoreResult<Product>;

    /// All products, ordered by identifier.
    fn list_products(&self) -> CoreResult<Vec<Product>>;
}

pub trait ReportStore: Send + Sync {
    fn submit(&self, report: CounterfeitReport) -> CoreResult<()>;

    /// All reports, newest first.
    fn list_reports(&self) -> CoreResult<Vec<CounterfeitReport>>;
}

/// Append-only history of scans.
pub trait ScanLog: Send + Sync {
    fn append(&self, record: ScanRecord) -> CoreResult<()>;

    /// All scans, newest first.
    fn list_scans(&self) -> CoreResult<Vec<ScanRecord>>;
}

/// The stores a running process works against.
#[derive(Clone)]
pub struct Stores {
    pub catalog: Arc<dyn ProductCatalog>,
    pub reports: Arc<dyn ReportStore>,
    pub scans: Arc<dyn ScanLog>,
}

impl Stores {
    /// Open the backend selected in `cfg`.
    pub fn open(cfg: &CoreConfig) -> CoreResult<Self> {
        match cfg.storage_backend() {
            StorageBackend::File => {
                let store = Arc::new(FileStore::open(
                    cfg.products_dir(),
                    cfg.reports_dir(),
                    cfg.scans_dir(),
                )?);
                tracing::info!("using file storage under {}", cfg.data_dir().display());
                Ok(Self {
                    catalog: store.clone(),
                    reports: store.clone(),
                    scans: store,
                })
            }
            StorageBackend::Memory => {
                let store = Arc::new(MemoryStore::new());
                tracing::info!("using in-memory storage");
                Ok(Self {
                    catalog: store.clone(),
                    reports: store.clone(),
                    scans: store,
                })
            }
        }
    }
}
