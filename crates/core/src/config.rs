//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services. Request
//! handling never reads process-wide environment variables, which keeps behaviour consistent
//! across multi-threaded runtimes and test harnesses.
//!
//! Recognised variables:
//! - `QB_DATA_DIR`: root directory for file storage (default `qualibev_data`)
//! - `QB_STORAGE`: `file` (default) or `memory`
//! - `QB_MAX_REGISTRATION_ATTEMPTS`: identifiers drawn per registration (default 5)
//! - `QB_DEFAULT_MAX_SCANS`: scan allowance for products that do not set one (default 15)

use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_MAX_REGISTRATION_ATTEMPTS, DEFAULT_MAX_SCANS, PRODUCTS_DIR_NAME,
    REPORTS_DIR_NAME, SCANS_DIR_NAME,
};
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DATA_DIR_VAR: &str = "QB_DATA_DIR";
pub const STORAGE_VAR: &str = "QB_STORAGE";
pub const MAX_REGISTRATION_ATTEMPTS_VAR: &str = "QB_MAX_REGISTRATION_ATTEMPTS";
pub const DEFAULT_MAX_SCANS_VAR: &str = "QB_DEFAULT_MAX_SCANS";

/// Where products and reports are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// Sharded JSON documents under the data directory.
    File,
    /// Process-local maps; everything is lost on exit.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(CoreError::InvalidInput(format!(
                "{STORAGE_VAR} must be 'file' or 'memory', got: '{other}'"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    storage_backend: StorageBackend,
    max_registration_attempts: u32,
    default_max_scans: u32,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if either numeric limit is zero.
    pub fn new(
        data_dir: PathBuf,
        storage_backend: StorageBackend,
        max_registration_attempts: u32,
        default_max_scans: u32,
    ) -> CoreResult<Self> {
        if max_registration_attempts == 0 {
            return Err(CoreError::InvalidInput(
                "max_registration_attempts must be at least 1".into(),
            ));
        }
        if default_max_scans == 0 {
            return Err(CoreError::InvalidInput(
                "default_max_scans must be at least 1".into(),
            ));
        }

        Ok(Self {
            data_dir,
            storage_backend,
            max_registration_attempts,
            default_max_scans,
        })
    }

    /// Resolve configuration through `lookup`, falling back to defaults for unset or blank
    /// variables.
    ///
    /// Binaries pass `|key| std::env::var(key).ok()`; tests pass a closure over a fixed map.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let data_dir = value(DATA_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let storage_backend = value(STORAGE_VAR)
            .map(|v| v.parse::<StorageBackend>())
            .transpose()?
            .unwrap_or(StorageBackend::File);
        let max_registration_attempts = u32_from_env_value(
            MAX_REGISTRATION_ATTEMPTS_VAR,
            value(MAX_REGISTRATION_ATTEMPTS_VAR),
            DEFAULT_MAX_REGISTRATION_ATTEMPTS,
        )?;
        let default_max_scans = u32_from_env_value(
            DEFAULT_MAX_SCANS_VAR,
            value(DEFAULT_MAX_SCANS_VAR),
            DEFAULT_MAX_SCANS,
        )?;

        Self::new(
            data_dir,
            storage_backend,
            max_registration_attempts,
            default_max_scans,
        )
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn products_dir(&self) -> PathBuf {
        self.data_dir.join(PRODUCTS_DIR_NAME)
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir.join(REPORTS_DIR_NAME)
    }

    pub fn scans_dir(&self) -> PathBuf {
        self.data_dir.join(SCANS_DIR_NAME)
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn max_registration_attempts(&self) -> u32 {
        self.max_registration_attempts
    }

    pub fn default_max_scans(&self) -> u32 {
        self.default_max_scans
    }
}

/// Parse an unsigned limit from an optional environment value.
///
/// `None` yields `default`.
fn u32_from_env_value(name: &str, value: Option<String>, default: u32) -> CoreResult<u32> {
    match value {
        None => Ok(default),
        Some(v) => v.parse::<u32>().map_err(|e| {
            CoreError::InvalidInput(format!("{name} must be a positive integer, got '{v}': {e}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let cfg = CoreConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(cfg.data_dir(), Path::new(DEFAULT_DATA_DIR));
        assert_eq!(cfg.storage_backend(), StorageBackend::File);
        assert_eq!(cfg.max_registration_attempts(), 5);
        assert_eq!(cfg.default_max_scans(), 15);
        assert_eq!(
            cfg.products_dir(),
            PathBuf::from(DEFAULT_DATA_DIR).join("products")
        );
    }

    #[test]
    fn test_reads_overrides() {
        let cfg = CoreConfig::from_lookup(lookup_from(&[
            (DATA_DIR_VAR, "/srv/qb"),
            (STORAGE_VAR, " Memory "),
            (MAX_REGISTRATION_ATTEMPTS_VAR, "9"),
            (DEFAULT_MAX_SCANS_VAR, "3"),
        ]))
        .unwrap();

        assert_eq!(cfg.data_dir(), Path::new("/srv/qb"));
        assert_eq!(cfg.storage_backend(), StorageBackend::Memory);
        assert_eq!(cfg.max_registration_attempts(), 9);
        assert_eq!(cfg.default_max_scans(), 3);
        assert_eq!(cfg.reports_dir(), PathBuf::from("/srv/qb/reports"));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let cfg =
            CoreConfig::from_lookup(lookup_from(&[(DATA_DIR_VAR, "  "), (STORAGE_VAR, "")]))
                .unwrap();

        assert_eq!(cfg.data_dir(), Path::new(DEFAULT_DATA_DIR));
        assert_eq!(cfg.storage_backend(), StorageBackend::File);
    }

    #[test]
    fn test_rejects_zero_limits() {
        let result = CoreConfig::from_lookup(lookup_from(&[(MAX_REGISTRATION_ATTEMPTS_VAR, "0")]));
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));

        let result = CoreConfig::from_lookup(lookup_from(&[(DEFAULT_MAX_SCANS_VAR, "0")]));
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_garbage_values() {
        let result = CoreConfig::from_lookup(lookup_from(&[(DEFAULT_MAX_SCANS_VAR, "lots")]));
        match result {
            Err(CoreError::InvalidInput(msg)) => assert!(msg.contains(DEFAULT_MAX_SCANS_VAR)),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }

        let result = CoreConfig::from_lookup(lookup_from(&[(STORAGE_VAR, "redis")]));
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }
}
