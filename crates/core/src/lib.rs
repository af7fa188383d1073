//! # QualiBev Core
//!
//! Core business logic for QualiBev product verification.
//!
//! This crate contains pure data operations:
//! - Product registration, pairing identifier generation with insert-if-absent storage
//! - Scan verification, validating payloads before any catalog lookup
//! - Counterfeit report intake
//! - Scan history and activity totals
//! - Local storage backends (in-memory and sharded JSON files)
//!
//! **No API concerns**: HTTP servers, request parsing and command-line handling belong in
//! `api-rest` and `qb-cli`.

pub mod config;
pub mod constants;
pub mod error;
pub mod product;
pub mod registration;
pub mod report;
pub mod scan;
pub mod store;

pub use config::{CoreConfig, StorageBackend};
pub use error::{CoreError, CoreResult};
pub use product::{NewProduct, Product, ProductStatus};
pub use qb_types::{CountryCode, NonEmptyText};
pub use qb_verification_id::{VerificationId, VerificationIdError, VerificationIdService};
pub use registration::RegistrationService;
pub use report::{CounterfeitReport, NewReport, ReportService};
pub use scan::{ActivityStats, ScanMethod, ScanOutcome, ScanRecord, ScanService, StatsService};
pub use store::{FileStore, MemoryStore, ProductCatalog, ReportStore, ScanLog, Stores};
