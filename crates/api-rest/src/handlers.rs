//! REST handlers.
//!
//! Each handler is a thin adapter over [`PatientService`](pms_core::PatientService): extract,
//! call, wrap the result. Status codes for failures come from [`ApiError`].

use crate::error::{ApiError, JsonBody};
use crate::AppState;
use api_shared::{HealthRes, InfoRes, InfoService, MessageRes};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use pms_core::{PatientDraft, PatientListing, PatientPatch, PatientView};
use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for the sorted listing.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SortParams {
    /// Sort on the basis of height, weight or bmi
    pub sort_by: Option<String>,
    /// Sort in ascending (asc) or descending (desc) order
    pub order: Option<String>,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "API information", body = InfoRes)
    )
)]
#[axum::debug_handler]
pub async fn root() -> Json<InfoRes> {
    Json(InfoService::root())
}

#[utoipa::path(
    get,
    path = "/about",
    responses(
        (status = 200, description = "API description", body = InfoRes)
    )
)]
#[axum::debug_handler]
pub async fn about() -> Json<InfoRes> {
    Json(InfoService::about())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks. Does not read the patient store.
#[axum::debug_handler]
pub async fn health() -> Json<HealthRes> {
    Json(InfoService::check_health())
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "All patients keyed by ID, with BMI and verdict"),
        (status = 500, description = "Internal server error")
    )
)]
/// List all patients in the system
///
/// Reads the whole store and returns it as an object keyed by patient ID. BMI and verdict are
/// recomputed for every patient.
///
/// # Errors
/// Returns `500 Internal Server Error` if the store cannot be read.
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<PatientListing>, ApiError> {
    Ok(Json(state.patient_service.list()?))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(
        ("id" = String, Path, description = "ID of the patient", example = "P001")
    ),
    responses(
        (status = 200, description = "Patient record", body = PatientView),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub async fn view_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PatientView>, ApiError> {
    Ok(Json(state.patient_service.get(&id)?))
}

#[utoipa::path(
    get,
    path = "/patients/sorted",
    params(SortParams),
    responses(
        (status = 200, description = "Patients in the requested order", body = [PatientView]),
        (status = 400, description = "Invalid sort field or order"),
        (status = 500, description = "Internal server error")
    )
)]
/// List all patients ordered by height, weight or BMI
///
/// Both parameters are case-insensitive and `order` defaults to `asc`. Patients lacking the
/// field sort as if it were 0; ties keep store order.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - `sort_by` is missing or not one of `height`, `weight`, `bmi`, or
/// - `order` is not `asc` or `desc`.
#[axum::debug_handler]
pub async fn sort_patients(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> Result<Json<Vec<PatientView>>, ApiError> {
    let sorted = state
        .patient_service
        .sorted(params.sort_by.as_deref(), params.order.as_deref())?;
    Ok(Json(sorted))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = PatientDraft,
    responses(
        (status = 201, description = "Patient created", body = MessageRes),
        (status = 400, description = "Patient already exists"),
        (status = 422, description = "Validation error"),
        (status = 500, description = "Internal server error")
    )
)]
/// Create a new patient record
///
/// The ID is supplied by the caller and cannot be changed afterwards. Only the patient fields
/// are stored; BMI and verdict are derived on read.
///
/// # Errors
/// - `422 Unprocessable Entity` if the body is not valid JSON, or a field is missing, wrongly
///   typed or out of range.
/// - `400 Bad Request` if a patient with this ID already exists.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    JsonBody(draft): JsonBody<PatientDraft>,
) -> Result<(StatusCode, Json<MessageRes>), ApiError> {
    let id = state.patient_service.create(draft)?;
    Ok((StatusCode::CREATED, Json(MessageRes::created(&id))))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(
        ("id" = String, Path, description = "ID of the patient", example = "P001")
    ),
    request_body = PatientPatch,
    responses(
        (status = 200, description = "Patient updated", body = MessageRes),
        (status = 404, description = "Patient not found"),
        (status = 422, description = "Validation error"),
        (status = 500, description = "Internal server error")
    )
)]
/// Update some fields of an existing patient
///
/// Fields absent from the body are left as they are. An explicit `null` clears the field,
/// which fails validation for every patient field.
///
/// # Errors
/// - `422 Unprocessable Entity` if a supplied value or the merged record is invalid.
/// - `404 Not Found` if no patient has this ID.
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<PatientPatch>,
) -> Result<Json<MessageRes>, ApiError> {
    state.patient_service.update(&id, patch)?;
    Ok(Json(MessageRes::updated(&id)))
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(
        ("id" = String, Path, description = "ID of the patient", example = "P001")
    ),
    responses(
        (status = 200, description = "Patient deleted", body = MessageRes),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageRes>, ApiError> {
    state.patient_service.delete(&id)?;
    Ok(Json(MessageRes::deleted(&id)))
}
