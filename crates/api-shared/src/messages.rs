//! Wire messages shared by the API surfaces.

use pms_core::{FieldIssue, PatientError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Static informational payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InfoRes {
    pub message: String,
}

/// Liveness payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Outcome of a create, update or delete.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

impl MessageRes {
    pub fn created(id: &str) -> Self {
        Self {
            message: format!("Patient {id} created successfully!"),
        }
    }

    pub fn updated(id: &str) -> Self {
        Self {
            message: format!("Patient {id} updated successfully!"),
        }
    }

    pub fn deleted(id: &str) -> Self {
        Self {
            message: format!("Patient {id} deleted successfully!"),
        }
    }
}

/// Error payload. `fields` is only present for validation failures.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldIssue>,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: Vec::new(),
        }
    }

    /// Client-facing payload for `err`. Storage failures are not described to the caller.
    pub fn from_patient_error(err: &PatientError) -> Self {
        match err {
            PatientError::Validation(errors) => Self {
                error: "validation failed".into(),
                fields: errors.issues().to_vec(),
            },
            e if e.is_storage() => Self::new("Internal error"),
            e => Self::new(e.to_string()),
        }
    }
}
