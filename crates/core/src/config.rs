//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::DEFAULT_STORE_PATH;
use crate::store::JsonFileStore;
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    store_path: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(store_path: PathBuf) -> PatientResult<Self> {
        if store_path.as_os_str().is_empty() {
            return Err(PatientError::InvalidInput(
                "store path cannot be empty".into(),
            ));
        }

        Ok(Self { store_path })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Opens the configured store, which must already exist as a regular file.
    ///
    /// The store is never created implicitly here; `pms init` does that explicitly.
    pub fn open_store(&self) -> PatientResult<JsonFileStore> {
        validate_store_file(&self.store_path)?;
        Ok(JsonFileStore::new(self.store_path.clone()))
    }
}

/// Resolve the store path from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default `patients.json`.
pub fn store_path_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
}

/// Checks that `path` names an existing regular file.
pub fn validate_store_file(path: &Path) -> PatientResult<()> {
    if !path.is_file() {
        return Err(PatientError::InvalidInput(format!(
            "patient store does not exist or is not a file: {}",
            path.display()
        )));
    }
    Ok(())
}
