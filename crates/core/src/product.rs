//! Product records keyed by verification identifier.

use crate::constants::DEFAULT_ORIGIN_COUNTRY;
use crate::{CoreError, CoreResult};
use chrono::{DateTime, NaiveDate, Utc};
use qb_types::{CountryCode, NonEmptyText};
use qb_verification_id::VerificationId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    Inactive,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
        }
    }
}

/// A registered physical product batch.
///
/// The verification identifier is the primary key and never changes. Products are deactivated
/// rather than deleted so that old labels still resolve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub verification_id: VerificationId,
    pub product_name: NonEmptyText,
    pub brand_name: NonEmptyText,
    pub batch_number: NonEmptyText,
    pub alcohol_type: NonEmptyText,
    pub origin_country: CountryCode,
    pub manufacture_date: NaiveDate,
    pub max_scans_allowed: u32,
    pub scan_count: u32,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<NonEmptyText>,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    /// True once more scans have been recorded than the label allows.
    pub fn scans_exceeded(&self) -> bool {
        self.scan_count > self.max_scans_allowed
    }
}

/// Unvalidated registration request, as received from an admin client.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewProduct {
    pub product_name: String,
    pub brand_name: String,
    pub batch_number: String,
    pub alcohol_type: String,
    #[serde(default)]
    pub origin_country: Option<String>,
    #[serde(default)]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(default)]
    pub max_scans_allowed: Option<u32>,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// A registration request that passed validation and only lacks an identifier.
#[derive(Clone, Debug)]
pub(crate) struct ProductDraft {
    product_name: NonEmptyText,
    brand_name: NonEmptyText,
    batch_number: NonEmptyText,
    alcohol_type: NonEmptyText,
    origin_country: CountryCode,
    manufacture_date: NaiveDate,
    max_scans_allowed: u32,
    created_by: Option<NonEmptyText>,
}

impl NewProduct {
    /// Validate every field, filling defaults for the optional ones.
    pub(crate) fn validate(
        self,
        default_max_scans: u32,
        today: NaiveDate,
    ) -> CoreResult<ProductDraft> {
        let max_scans_allowed = self.max_scans_allowed.unwrap_or(default_max_scans);
        if max_scans_allowed == 0 {
            return Err(CoreError::InvalidInput(
                "max_scans_allowed must be at least 1".into(),
            ));
        }

        let origin_country = match self.origin_country.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => CountryCode::new(code)?,
            _ => CountryCode::new(DEFAULT_ORIGIN_COUNTRY)?,
        };

        let created_by = self
            .created_by
            .filter(|s| !s.trim().is_empty())
            .map(NonEmptyText::new)
            .transpose()?;

        Ok(ProductDraft {
            product_name: required("product_name", &self.product_name)?,
            brand_name: required("brand_name", &self.brand_name)?,
            batch_number: required("batch_number", &self.batch_number)?,
            alcohol_type: required("alcohol_type", &self.alcohol_type)?,
            origin_country,
            manufacture_date: self.manufacture_date.unwrap_or(today),
            max_scans_allowed,
            created_by,
        })
    }
}

impl ProductDraft {
    pub(crate) fn to_product(
        &self,
        verification_id: VerificationId,
        created_at: DateTime<Utc>,
    ) -> Product {
        Product {
            verification_id,
            product_name: self.product_name.clone(),
            brand_name: self.brand_name.clone(),
            batch_number: self.batch_number.clone(),
            alcohol_type: self.alcohol_type.clone(),
            origin_country: self.origin_country.clone(),
            manufacture_date: self.manufacture_date,
            max_scans_allowed: self.max_scans_allowed,
            scan_count: 0,
            status: ProductStatus::Active,
            created_at,
            created_by: self.created_by.clone(),
        }
    }
}

pub(crate) fn required(field: &str, value: &str) -> CoreResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|_| CoreError::InvalidInput(format!("{field} is required")))
}
