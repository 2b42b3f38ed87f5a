//! Mapping from core errors to HTTP responses.

use api_shared::ErrorRes;
use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pms_core::{PatientError, ValidationErrors};

/// Error returned by REST handlers.
#[derive(Debug)]
pub struct ApiError(pub PatientError);

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        ApiError(err)
    }
}

/// A body that cannot be read as the expected JSON is reported like any other invalid input.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let mut errors = ValidationErrors::new();
        errors.push("body", rejection.body_text());
        ApiError(PatientError::Validation(errors))
    }
}

/// JSON request body whose rejections go through [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PatientError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PatientError::NotFound(_) => StatusCode::NOT_FOUND,
            PatientError::Conflict(_) | PatientError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            PatientError::InvalidInput(_)
            | PatientError::FileRead { .. }
            | PatientError::FileWrite { .. }
            | PatientError::Serialization(_)
            | PatientError::Deserialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Patient store error: {}", self.0);
        } else {
            tracing::debug!("Rejected request ({}): {}", status, self.0);
        }

        (status, Json(ErrorRes::from_patient_error(&self.0))).into_response()
    }
}
