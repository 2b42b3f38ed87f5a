//! # API REST
//!
//! REST API implementation for the patient management system.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, status codes, CORS)
//!
//! Uses `api-shared` for wire messages and `pms-core` for every data operation.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;

pub use error::ApiError;

use axum::{routing::get, Router};
use pms_core::PatientService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state for the REST API server
///
/// Holds the patient service, whose store is injected by the caller. Nothing is cached
/// between requests; each handler reads the store afresh.
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root,
        handlers::about,
        handlers::health,
        handlers::list_patients,
        handlers::view_patient,
        handlers::sort_patients,
        handlers::create_patient,
        handlers::update_patient,
        handlers::delete_patient,
    ),
    components(schemas(
        api_shared::InfoRes,
        api_shared::HealthRes,
        api_shared::MessageRes,
        api_shared::ErrorRes,
        pms_core::FieldIssue,
        pms_core::Gender,
        pms_core::Verdict,
        pms_core::PatientDraft,
        pms_core::PatientPatch,
        pms_core::StoredPatient,
        pms_core::PatientView,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router over `patient_service`.
///
/// Routes:
/// - `GET /`, `GET /about`, `GET /health`
/// - `GET /patients`, `POST /patients`
/// - `GET /patients/sorted?sort_by=&order=`
/// - `GET|PUT|DELETE /patients/:id`
/// - Swagger UI at `/swagger-ui`, OpenAPI document at `/api-docs/openapi.json`
pub fn router(patient_service: PatientService) -> Router {
    let state = AppState { patient_service };

    Router::new()
        .route("/", get(handlers::root))
        .route("/about", get(handlers::about))
        .route("/health", get(handlers::health))
        .route(
            "/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route("/patients/sorted", get(handlers::sort_patients))
        .route(
            "/patients/:id",
            get(handlers::view_patient)
                .put(handlers::update_patient)
                .delete(handlers::delete_patient),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
