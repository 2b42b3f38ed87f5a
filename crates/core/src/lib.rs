//! # PMS Core
//!
//! Core business logic for the patient management system.
//!
//! This crate contains pure data operations and storage:
//! - Validated patient records with derived BMI and verdict
//! - Partial updates that distinguish absent fields from explicit `null`
//! - Whole-file JSON persistence behind the [`PatientStore`] gateway
//!
//! **No API concerns**: HTTP servers, status codes and wire messages belong in `api-rest` or
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod patch;
pub mod patient;
pub mod service;
pub mod store;
pub mod validation;

pub use config::CoreConfig;
pub use constants::DEFAULT_STORE_PATH;
pub use error::{PatientError, PatientResult};
pub use patch::{Field, PatientPatch};
pub use patient::{Gender, Patient, PatientDraft, PatientView, StoredPatient, Verdict};
pub use service::{PatientListing, PatientService, SortField, SortOrder};
pub use store::{Collection, JsonFileStore, MemoryStore, PatientStore};
pub use validation::{FieldIssue, ValidationErrors};
