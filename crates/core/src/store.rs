//! Patient store persistence.
//!
//! The whole collection lives in a single JSON object whose keys are patient IDs and whose
//! values are [`StoredPatient`]s:
//!
//! ```text
//! {
//!     "P001": {
//!         "name": "Ananya Verma",
//!         "city": "Guwahati",
//!         "age": 28,
//!         "gender": "Female",
//!         "height": 1.65,
//!         "weight": 90.0
//!     }
//! }
//! ```
//!
//! Every operation reads the whole file and every mutation rewrites it. Writes are not atomic
//! and there is no locking: two concurrent writers race and the last one wins.

use crate::error::{PatientError, PatientResult};
use crate::patient::StoredPatient;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// All persisted patients, keyed by ID, in file order.
///
/// Inserting an existing ID replaces the value in place and new IDs are appended. Remove with
/// `shift_remove` so the remaining entries keep their relative order.
pub type Collection = IndexMap<String, StoredPatient>;

/// Gateway to wherever the collection is persisted.
pub trait PatientStore: Send + Sync {
    /// Reads the entire collection.
    fn load(&self) -> PatientResult<Collection>;

    /// Replaces the entire persisted collection with `collection`.
    fn save(&self, collection: &Collection) -> PatientResult<()>;
}

/// Store backed by a single JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates an empty store file if none exists yet.
    ///
    /// Returns `true` if a file was created. An existing file is never touched.
    pub fn initialise(&self) -> PatientResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PatientError::FileWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        self.save(&Collection::new())?;
        Ok(true)
    }
}

impl PatientStore for JsonFileStore {
    fn load(&self) -> PatientResult<Collection> {
        let contents = fs::read_to_string(&self.path).map_err(|source| PatientError::FileRead {
            path: self.path.clone(),
            source,
        })?;
        let collection: Collection =
            serde_json::from_str(&contents).map_err(PatientError::Deserialization)?;

        tracing::debug!(
            "loaded {} patients from {}",
            collection.len(),
            self.path.display()
        );
        Ok(collection)
    }

    fn save(&self, collection: &Collection) -> PatientResult<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        collection
            .serialize(&mut serializer)
            .map_err(PatientError::Serialization)?;

        fs::write(&self.path, buf).map_err(|source| PatientError::FileWrite {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(
            "saved {} patients to {}",
            collection.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// In-process store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: Mutex<Collection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(collection: Collection) -> Self {
        Self {
            collection: Mutex::new(collection),
        }
    }

    /// Returns a copy of what is currently stored.
    pub fn snapshot(&self) -> Collection {
        self.collection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PatientStore for MemoryStore {
    fn load(&self) -> PatientResult<Collection> {
        Ok(self.snapshot())
    }

    fn save(&self, collection: &Collection) -> PatientResult<()> {
        *self
            .collection
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = collection.clone();
        Ok(())
    }
}
