//! Constants used throughout the QualiBev core crate.

/// Default directory for local storage when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "qualibev_data";

/// Directory name for product records.
pub const PRODUCTS_DIR_NAME: &str = "products";

/// Directory name for counterfeit reports.
pub const REPORTS_DIR_NAME: &str = "reports";

/// Directory name for scan history.
pub const SCANS_DIR_NAME: &str = "scans";

/// Filename for a stored product record.
pub const PRODUCT_JSON_FILENAME: &str = "product.json";

/// Scans a product may receive before further scans are treated as a cloned label.
pub const DEFAULT_MAX_SCANS: u32 = 15;

/// Identifiers drawn per registration before giving up on collisions.
pub const DEFAULT_MAX_REGISTRATION_ATTEMPTS: u32 = 5;

/// Origin country assumed when a registration does not name one.
pub const DEFAULT_ORIGIN_COUNTRY: &str = "ZA";

/// Upper bound on identifiers returned by a single bulk generate request.
pub const MAX_GENERATE_BATCH: usize = 100;
