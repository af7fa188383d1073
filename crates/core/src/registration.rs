//! Product registration.
//!
//! Registering a product allocates its verification identifier. Generation alone cannot promise
//! uniqueness, so each candidate goes straight into [`ProductCatalog::insert_if_absent`]; a
//! collision draws a fresh identifier, up to the configured number of attempts.

use crate::config::CoreConfig;
use crate::product::{NewProduct, Product, ProductStatus};
use crate::store::ProductCatalog;
use crate::{CoreError, CoreResult};
use chrono::Utc;
use qb_verification_id::{VerificationId, VerificationIdService};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;

pub struct RegistrationService<R = OsRng> {
    cfg: Arc<CoreConfig>,
    catalog: Arc<dyn ProductCatalog>,
    ids: VerificationIdService<R>,
}

impl RegistrationService<OsRng> {
    pub fn new(cfg: Arc<CoreConfig>, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self::with_id_service(cfg, catalog, VerificationIdService::new())
    }
}

impl<R: RngCore> RegistrationService<R> {
    pub fn with_id_service(
        cfg: Arc<CoreConfig>,
        catalog: Arc<dyn ProductCatalog>,
        ids: VerificationIdService<R>,
    ) -> Self {
        Self { cfg, catalog, ids }
    }

    /// Mint an identifier without registering anything.
    ///
    /// Useful for previewing labels; the value is not reserved.
    pub fn preview_id(&self) -> CoreResult<VerificationId> {
        Ok(self.ids.generate()?)
    }

    /// Register a product under a freshly generated identifier.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidInput`] / [`CoreError::Text`] if the request is incomplete
    /// - [`CoreError::VerificationId`] if the entropy source failed
    /// - [`CoreError::RegistrationExhausted`] if every attempt collided
    /// - storage errors from the catalog
    pub fn register(&self, new: NewProduct) -> CoreResult<Product> {
        let now = Utc::now();
        let draft = new.validate(self.cfg.default_max_scans(), now.date_naive())?;
        let attempts = self.cfg.max_registration_attempts();

        for attempt in 1..=attempts {
            let id = self.ids.generate()?;
            match self.catalog.insert_if_absent(draft.to_product(id, now)) {
                Ok(product) => {
                    tracing::info!(
                        verification_id = %product.verification_id,
                        attempt,
                        "registered product"
                    );
                    return Ok(product);
                }
                Err(CoreError::DuplicateVerificationId(taken)) => {
                    tracing::warn!(
                        verification_id = %taken,
                        attempt,
                        "verification id collision, regenerating"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(CoreError::RegistrationExhausted { attempts })
    }

    /// Stop accepting scans for a product. The record is kept.
    pub fn deactivate(&self, id: &VerificationId) -> CoreResult<Product> {
        let product = self.catalog.set_status(id, ProductStatus::Inactive)?;
        tracing::info!(verification_id = %id, "deactivated product");
        Ok(product)
    }

    pub fn reactivate(&self, id: &VerificationId) -> CoreResult<Product> {
        let product = self.catalog.set_status(id, ProductStatus::Active)?;
        tracing::info!(verification_id = %id, "reactivated product");
        Ok(product)
    }

    pub fn list(&self) -> CoreResult<Vec<Product>> {
        self.catalog.list_products()
    }
}
