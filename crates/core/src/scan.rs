//! Consumer scan verification.
//!
//! A scan payload (decoded QR text, NFC record, or a typed code) is checked syntactically before
//! the catalog is consulted. Garbage from an unrelated QR code is an expected input, not an
//! error, and never reaches the catalog.
//!
//! Every scan, malformed ones included, is appended to the [`ScanLog`] so that history and
//! activity counts reflect what consumers actually scanned.

use crate::product::Product;
use crate::report::CounterfeitReport;
use crate::store::{ProductCatalog, ReportStore, ScanLog};
use crate::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use qb_verification_id::VerificationId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMethod {
    Qr,
    Nfc,
    Manual,
}

impl fmt::Display for ScanMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScanMethod::Qr => "qr",
            ScanMethod::Nfc => "nfc",
            ScanMethod::Manual => "manual",
        })
    }
}

impl FromStr for ScanMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qr" => Ok(Self::Qr),
            "nfc" => Ok(Self::Nfc),
            "manual" => Ok(Self::Manual),
            other => Err(CoreError::InvalidInput(format!(
                "scan method must be qr, nfc or manual, got: '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: Uuid,
    /// `None` when the payload was not a verification identifier.
    pub verification_id: Option<VerificationId>,
    pub method: ScanMethod,
    pub authentic: bool,
    pub scanned_at: DateTime<Utc>,
}

/// Result of checking one scan payload.
///
/// Everything other than [`ScanOutcome::Authentic`] should be presented to the consumer as a
/// suspected counterfeit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// The payload is not a verification identifier.
    Malformed { record: ScanRecord },
    /// Well-formed, but no product carries this identifier.
    Unknown { record: ScanRecord },
    /// The product exists but was withdrawn.
    Deactivated { product: Product, record: ScanRecord },
    /// The label has been scanned more often than a genuine bottle would be.
    ScanLimitExceeded { product: Product, record: ScanRecord },
    Authentic { product: Product, record: ScanRecord },
}

impl ScanOutcome {
    pub fn record(&self) -> &ScanRecord {
        match self {
            ScanOutcome::Malformed { record }
            | ScanOutcome::Unknown { record }
            | ScanOutcome::Deactivated { record, .. }
            | ScanOutcome::ScanLimitExceeded { record, .. }
            | ScanOutcome::Authentic { record, .. } => record,
        }
    }

    pub fn product(&self) -> Option<&Product> {
        match self {
            ScanOutcome::Malformed { .. } | ScanOutcome::Unknown { .. } => None,
            ScanOutcome::Deactivated { product, .. }
            | ScanOutcome::ScanLimitExceeded { product, .. }
            | ScanOutcome::Authentic { product, .. } => Some(product),
        }
    }

    pub fn is_authentic(&self) -> bool {
        matches!(self, ScanOutcome::Authentic { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ScanOutcome::Malformed { .. } => "malformed",
            ScanOutcome::Unknown { .. } => "unknown",
            ScanOutcome::Deactivated { .. } => "deactivated",
            ScanOutcome::ScanLimitExceeded { .. } => "scan_limit_exceeded",
            ScanOutcome::Authentic { .. } => "authentic",
        }
    }
}

#[derive(Clone)]
pub struct ScanService {
    catalog: Arc<dyn ProductCatalog>,
    scans: Arc<dyn ScanLog>,
}

impl ScanService {
    pub fn new(catalog: Arc<dyn ProductCatalog>, scans: Arc<dyn ScanLog>) -> Self {
        Self { catalog, scans }
    }

    /// Verify one scan payload and count it against the product.
    ///
    /// The payload is used exactly as given: no trimming or case folding. The resulting record is
    /// appended to the scan log; a failed append is logged and does not change the outcome.
    pub fn verify(&self, payload: &str, method: ScanMethod) -> CoreResult<ScanOutcome> {
        let outcome = self.classify(payload, method)?;
        if let Err(e) = self.scans.append(outcome.record().clone()) {
            tracing::warn!(scan_id = %outcome.record().id, "failed to append scan record: {}", e);
        }
        Ok(outcome)
    }

    /// Scan history, newest first.
    pub fn history(&self) -> CoreResult<Vec<ScanRecord>> {
        self.scans.list_scans()
    }

    fn classify(&self, payload: &str, method: ScanMethod) -> CoreResult<ScanOutcome> {
        let scanned_at = Utc::now();
        let record = |verification_id: Option<VerificationId>, authentic: bool| ScanRecord {
            id: Uuid::new_v4(),
            verification_id,
            method,
            authentic,
            scanned_at,
        };

        let Ok(id) = VerificationId::parse(payload) else {
            tracing::debug!(%method, "rejected malformed scan payload");
            return Ok(ScanOutcome::Malformed {
                record: record(None, false),
            });
        };

        let outcome = match self.catalog.record_scan(&id)? {
            None => ScanOutcome::Unknown {
                record: record(Some(id), false),
            },
            Some(product) if !product.is_active() => ScanOutcome::Deactivated {
                product,
                record: record(Some(id), false),
            },
            Some(product) if product.scans_exceeded() => ScanOutcome::ScanLimitExceeded {
                product,
                record: record(Some(id), false),
            },
            Some(product) => ScanOutcome::Authentic {
                product,
                record: record(Some(id), true),
            },
        };

        tracing::debug!(
            verification_id = ?outcome.record().verification_id.as_ref().map(VerificationId::as_str),
            %method,
            outcome = outcome.kind(),
            "scan verified"
        );
        Ok(outcome)
    }
}

/// Activity totals over the scan log and report store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ActivityStats {
    pub scans: usize,
    pub verified: usize,
    pub reports: usize,
}

impl ActivityStats {
    pub fn tally(scans: &[ScanRecord], reports: &[CounterfeitReport]) -> Self {
        Self {
            scans: scans.len(),
            verified: scans.iter().filter(|scan| scan.authentic).count(),
            reports: reports.len(),
        }
    }
}

/// Read-only summary of consumer activity.
#[derive(Clone)]
pub struct StatsService {
    scans: Arc<dyn ScanLog>,
    reports: Arc<dyn ReportStore>,
}

impl StatsService {
    pub fn new(scans: Arc<dyn ScanLog>, reports: Arc<dyn ReportStore>) -> Self {
        Self { scans, reports }
    }

    pub fn summary(&self) -> CoreResult<ActivityStats> {
        Ok(ActivityStats::tally(
            &self.scans.list_scans()?,
            &self.reports.list_reports()?,
        ))
    }
}
