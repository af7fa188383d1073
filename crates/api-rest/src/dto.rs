//! Request and response bodies for the REST API.
//!
//! Core types carry validated newtypes; these mirror them with plain strings so they can be
//! described in the OpenAPI document.

use chrono::NaiveDate;
use qb_core::{
    ActivityStats, CounterfeitReport, NewProduct, NewReport, Product, ScanOutcome, ScanRecord,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GenerateIdsQuery {
    /// Number of identifiers to mint (1-100, default 1)
    pub count: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateIdsRes {
    pub verification_ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidityRes {
    pub candidate: String,
    pub valid: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterProductReq {
    pub product_name: String,
    pub brand_name: String,
    pub batch_number: String,
    pub alcohol_type: String,
    /// Two-letter country code, defaults to ZA
    #[serde(default)]
    pub origin_country: Option<String>,
    /// YYYY-MM-DD, defaults to today
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(default)]
    pub max_scans_allowed: Option<u32>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl From<RegisterProductReq> for NewProduct {
    fn from(req: RegisterProductReq) -> Self {
        NewProduct {
            product_name: req.product_name,
            brand_name: req.brand_name,
            batch_number: req.batch_number,
            alcohol_type: req.alcohol_type,
            origin_country: req.origin_country,
            manufacture_date: req.manufacture_date,
            max_scans_allowed: req.max_scans_allowed,
            created_by: req.created_by,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductRes {
    pub verification_id: String,
    pub product_name: String,
    pub brand_name: String,
    pub batch_number: String,
    pub alcohol_type: String,
    pub origin_country: String,
    pub manufacture_date: String,
    pub max_scans_allowed: u32,
    pub scan_count: u32,
    pub status: String,
    pub created_at: String,
    pub created_by: Option<String>,
}

impl From<Product> for ProductRes {
    fn from(p: Product) -> Self {
        ProductRes {
            verification_id: p.verification_id.to_string(),
            product_name: p.product_name.to_string(),
            brand_name: p.brand_name.to_string(),
            batch_number: p.batch_number.to_string(),
            alcohol_type: p.alcohol_type.to_string(),
            origin_country: p.origin_country.to_string(),
            manufacture_date: p.manufacture_date.to_string(),
            max_scans_allowed: p.max_scans_allowed,
            scan_count: p.scan_count,
            status: p.status.as_str().to_string(),
            created_at: p.created_at.to_rfc3339(),
            created_by: p.created_by.map(|s| s.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListProductsRes {
    pub products: Vec<ProductRes>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScanReq {
    /// Decoded QR text, NFC record or typed code, used exactly as given
    pub payload: String,
    /// qr, nfc or manual (default qr)
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScanRecordRes {
    pub id: String,
    pub verification_id: Option<String>,
    pub method: String,
    pub authentic: bool,
    pub scanned_at: String,
}

impl From<&ScanRecord> for ScanRecordRes {
    fn from(r: &ScanRecord) -> Self {
        ScanRecordRes {
            id: r.id.to_string(),
            verification_id: r.verification_id.as_ref().map(|id| id.to_string()),
            method: r.method.to_string(),
            authentic: r.authentic,
            scanned_at: r.scanned_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScanRes {
    /// malformed, unknown, deactivated, scan_limit_exceeded or authentic
    pub outcome: String,
    pub authentic: bool,
    pub product: Option<ProductRes>,
    pub record: ScanRecordRes,
}

impl From<ScanOutcome> for ScanRes {
    fn from(outcome: ScanOutcome) -> Self {
        ScanRes {
            outcome: outcome.kind().to_string(),
            authentic: outcome.is_authentic(),
            record: ScanRecordRes::from(outcome.record()),
            product: outcome.product().cloned().map(ProductRes::from),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScanHistoryQuery {
    /// Return at most this many scans (default all)
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListScansRes {
    pub scans: Vec<ScanRecordRes>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsRes {
    pub scans: usize,
    /// Scans whose outcome was authentic
    pub verified: usize,
    pub reports: usize,
}

impl From<ActivityStats> for StatsRes {
    fn from(s: ActivityStats) -> Self {
        StatsRes {
            scans: s.scans,
            verified: s.verified,
            reports: s.reports,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitReportReq {
    pub product_name: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub verification_id: Option<String>,
    #[serde(default)]
    pub reported_by: Option<String>,
}

impl From<SubmitReportReq> for NewReport {
    fn from(req: SubmitReportReq) -> Self {
        NewReport {
            product_name: req.product_name,
            description: req.description,
            location: req.location,
            verification_id: req.verification_id,
            reported_by: req.reported_by,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportRes {
    pub id: String,
    pub product_name: String,
    pub description: String,
    pub location: Option<String>,
    pub verification_id: Option<String>,
    pub reported_by: Option<String>,
    pub reported_at: String,
}

impl From<CounterfeitReport> for ReportRes {
    fn from(r: CounterfeitReport) -> Self {
        ReportRes {
            id: r.id.to_string(),
            product_name: r.product_name.to_string(),
            description: r.description.to_string(),
            location: r.location.map(|s| s.to_string()),
            verification_id: r.verification_id.map(|id| id.to_string()),
            reported_by: r.reported_by.map(|s| s.to_string()),
            reported_at: r.reported_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListReportsRes {
    pub reports: Vec<ReportRes>,
}
