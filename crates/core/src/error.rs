use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("Patient {0} not found!")]
    NotFound(String),
    #[error("Patient {0} already exists!")]
    Conflict(String),
    #[error("{0}")]
    InvalidArgument(String),

    #[error("failed to read patient store {path}: {source}", path = path.display())]
    FileRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write patient store {path}: {source}", path = path.display())]
    FileWrite {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize patient store: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize patient store: {0}")]
    Deserialization(serde_json::Error),
}

impl PatientError {
    /// True for failures of the persisted store itself, which callers cannot correct.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            PatientError::FileRead { .. }
                | PatientError::FileWrite { .. }
                | PatientError::Serialization(_)
                | PatientError::Deserialization(_)
        )
    }
}

impl From<ValidationErrors> for PatientError {
    fn from(errors: ValidationErrors) -> Self {
        PatientError::Validation(errors)
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
