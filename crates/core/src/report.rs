//! Counterfeit reports submitted by consumers.

use crate::product::required;
use crate::store::ReportStore;
use crate::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use qb_types::NonEmptyText;
use qb_verification_id::VerificationId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterfeitReport {
    pub id: Uuid,
    pub product_name: NonEmptyText,
    pub description: NonEmptyText,
    #[serde(default)]
    pub location: Option<NonEmptyText>,
    /// Identifier printed on the suspect label, when the reporter could read one.
    #[serde(default)]
    pub verification_id: Option<VerificationId>,
    #[serde(default)]
    pub reported_by: Option<NonEmptyText>,
    pub reported_at: DateTime<Utc>,
}

/// Unvalidated report, as received from a consumer client.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewReport {
    pub product_name: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub verification_id: Option<String>,
    #[serde(default)]
    pub reported_by: Option<String>,
}

fn optional_text(value: Option<String>) -> CoreResult<Option<NonEmptyText>> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(NonEmptyText::new)
        .transpose()
        .map_err(CoreError::from)
}

#[derive(Clone)]
pub struct ReportService {
    reports: Arc<dyn ReportStore>,
}

impl ReportService {
    pub fn new(reports: Arc<dyn ReportStore>) -> Self {
        Self { reports }
    }

    /// Validate and store a report.
    ///
    /// A supplied verification identifier must be well-formed; a blank one is treated as absent.
    pub fn submit(&self, new: NewReport) -> CoreResult<CounterfeitReport> {
        let verification_id = match new.verification_id.as_deref().map(str::trim) {
            Some(candidate) if !candidate.is_empty() => {
                Some(VerificationId::parse(candidate).map_err(|e| {
                    CoreError::InvalidInput(format!("verification_id: {e}"))
                })?)
            }
            _ => None,
        };

        let report = CounterfeitReport {
            id: Uuid::new_v4(),
            product_name: required("product_name", &new.product_name)?,
            description: required("description", &new.description)?,
            location: optional_text(new.location)?,
            verification_id,
            reported_by: optional_text(new.reported_by)?,
            reported_at: Utc::now(),
        };

        self.reports.submit(report.clone())?;
        tracing::info!(
            report_id = %report.id,
            verification_id = ?report.verification_id.as_ref().map(VerificationId::as_str),
            "counterfeit report received"
        );
        Ok(report)
    }

    pub fn list(&self) -> CoreResult<Vec<CounterfeitReport>> {
        self.reports.list_reports()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::store::MemoryStore;

    pub(crate) fn sample_report(product_name: &str) -> CounterfeitReport {
        CounterfeitReport {
            id: Uuid::new_v4(),
            product_name: NonEmptyText::new(product_name).unwrap(),
            description: NonEmptyText::new("Seal broken, label misprinted").unwrap(),
            location: None,
            verification_id: None,
            reported_by: None,
            reported_at: Utc::now(),
        }
    }

    fn service() -> ReportService {
        ReportService::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn submit_stores_report_with_optional_fields() {
        let service = service();
        let report = service
            .submit(NewReport {
                product_name: "Hennessy VS".into(),
                description: "Cap does not match".into(),
                location: Some("Cape Town".into()),
                verification_id: Some("VRF-A1B2-C3D4-E5F6".into()),
                reported_by: Some("  ".into()),
            })
            .unwrap();

        assert_eq!(report.location.as_ref().unwrap().as_str(), "Cape Town");
        assert_eq!(
            report.verification_id.as_ref().unwrap().as_str(),
            "VRF-A1B2-C3D4-E5F6"
        );
        assert!(report.reported_by.is_none());
        assert_eq!(service.list().unwrap(), vec![report]);
    }

    #[test]
    fn submit_requires_name_and_description() {
        let service = service();
        let result = service.submit(NewReport {
            product_name: "Hennessy VS".into(),
            description: "".into(),
            ..Default::default()
        });

        match result {
            Err(CoreError::InvalidInput(msg)) => assert_eq!(msg, "description is required"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn submit_rejects_malformed_verification_id() {
        let service = service();
        let result = service.submit(NewReport {
            product_name: "Hennessy VS".into(),
            description: "Suspicious".into(),
            verification_id: Some("vrf-a1b2-c3d4-e5f6".into()),
            ..Default::default()
        });

        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }
}
