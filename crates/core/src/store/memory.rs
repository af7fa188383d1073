use super::{ProductCatalog, ReportStore, ScanLog};
use crate::product::{Product, ProductStatus};
use crate::report::CounterfeitReport;
use crate::scan::ScanRecord;
use crate::{CoreError, CoreResult};
use qb_verification_id::VerificationId;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<BTreeMap<VerificationId, Product>>,
    reports: RwLock<Vec<CounterfeitReport>>,
    scans: RwLock<Vec<ScanRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductCatalog for MemoryStore {
    fn insert_if_absent(&self, product: Product) -> CoreResult<Product> {
        let mut products = self
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match products.entry(product.verification_id.clone()) {
            Entry::Occupied(entry) => Err(CoreError::DuplicateVerificationId(entry.key().clone())),
            Entry::Vacant(entry) => Ok(entry.insert(product).clone()),
        }
    }

    fn get(&self, id: &VerificationId) -> CoreResult<Option<Product>> {
        let products = self.products.read().unwrap_or_else(PoisonError::into_inner);
        Ok(products.get(id).cloned())
    }

    fn record_scan(&self, id: &VerificationId) -> CoreResult<Option<Product>> {
        let mut products = self
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(products.get_mut(id).map(|product| {
            product.scan_count = product.scan_count.saturating_add(1);
            product.clone()
        }))
    }

    fn set_status(&self, id: &VerificationId, status: ProductStatus) -> CoreResult<Product> {
        let mut products = self
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let product = products
            .get_mut(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.clone()))?;
        product.status = status;
        Ok(product.clone())
    }

    fn list_products(&self) -> CoreResult<Vec<Product>> {
        let products = self.products.read().unwrap_or_else(PoisonError::into_inner);
        Ok(products.values().cloned().collect())
    }
}

impl ReportStore for MemoryStore {
    fn submit(&self, report: CounterfeitReport) -> CoreResult<()> {
        self.reports
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report);
        Ok(())
    }

    fn list_reports(&self) -> CoreResult<Vec<CounterfeitReport>> {
        let mut reports = self
            .reports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        reports.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
        Ok(reports)
    }
}

impl ScanLog for MemoryStore {
    fn append(&self, record: ScanRecord) -> CoreResult<()> {
        self.scans
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
        Ok(())
    }

    fn list_scans(&self) -> CoreResult<Vec<ScanRecord>> {
        let mut scans = self
            .scans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        scans.sort_by(|a, b| b.scanned_at.cmp(&a.scanned_at));
        Ok(scans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::tests::sample_product;
    use std::sync::Arc;

    #[test]
    fn insert_if_absent_keeps_existing_record() {
        let store = MemoryStore::new();
        let original = sample_product("VRF-A1B2-C3D4-E5F6");
        store.insert_if_absent(original.clone()).unwrap();

        let mut rival = sample_product("VRF-A1B2-C3D4-E5F6");
        rival.batch_number = crate::NonEmptyText::new("OTHER").unwrap();
        let result = store.insert_if_absent(rival);

        assert!(matches!(result, Err(CoreError::DuplicateVerificationId(_))));
        let stored = store.get(&original.verification_id).unwrap().unwrap();
        assert_eq!(stored.batch_number.as_str(), "BN48213");
    }

    #[test]
    fn concurrent_inserts_of_one_id_admit_exactly_one() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .insert_if_absent(sample_product("VRF-ZZZZ-0000-1111"))
                        .is_ok()
                })
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn record_scan_increments_and_ignores_unknown() {
        let store = MemoryStore::new();
        let product = store
            .insert_if_absent(sample_product("VRF-A1B2-C3D4-E5F6"))
            .unwrap();

        let first = store.record_scan(&product.verification_id).unwrap().unwrap();
        let second = store.record_scan(&product.verification_id).unwrap().unwrap();
        assert_eq!(first.scan_count, 1);
        assert_eq!(second.scan_count, 2);

        let unknown = VerificationId::parse("VRF-0000-0000-0000").unwrap();
        assert!(store.record_scan(&unknown).unwrap().is_none());
    }

    #[test]
    fn set_status_on_missing_product_is_not_found() {
        let store = MemoryStore::new();
        let id = VerificationId::parse("VRF-0000-0000-0000").unwrap();

        assert!(matches!(
            store.set_status(&id, ProductStatus::Inactive),
            Err(CoreError::ProductNotFound(_))
        ));
    }

    #[test]
    fn list_products_is_ordered_by_id() {
        let store = MemoryStore::new();
        for id in ["VRF-ZZZZ-0000-0000", "VRF-0000-0000-0000", "VRF-M000-0000-0000"] {
            store.insert_if_absent(sample_product(id)).unwrap();
        }

        let ids: Vec<String> = store
            .list_products()
            .unwrap()
            .into_iter()
            .map(|p| p.verification_id.to_string())
            .collect();
        assert_eq!(
            ids,
            vec!["VRF-0000-0000-0000", "VRF-M000-0000-0000", "VRF-ZZZZ-0000-0000"]
        );
    }

    #[test]
    fn scans_listed_newest_first() {
        let store = MemoryStore::new();
        let older = crate::scan::tests::sample_scan(None, false);
        let mut newer = crate::scan::tests::sample_scan(Some("VRF-A1B2-C3D4-E5F6"), true);
        newer.scanned_at = older.scanned_at + chrono::Duration::seconds(1);

        store.append(older.clone()).unwrap();
        store.append(newer.clone()).unwrap();

        assert_eq!(store.list_scans().unwrap(), vec![newer, older]);
    }
}
