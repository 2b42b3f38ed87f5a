use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pms_core::{
    config::store_path_from_env_value,
    constants::{DEFAULT_REST_ADDR, REST_ADDR_ENV, STORE_PATH_ENV},
    CoreConfig, PatientService,
};

/// Main entry point for the patient management server
///
/// Resolves configuration once, opens the patient store and serves the REST API.
///
/// # Environment Variables
/// - `PMS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PMS_STORE_PATH`: Patient store file (default: "patients.json"). Must already exist; create
///   it with `pms init`.
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the patient store file does not exist,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pms_run=info".parse()?)
                .add_directive("pms_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var(REST_ADDR_ENV).unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    let store_path = store_path_from_env_value(std::env::var(STORE_PATH_ENV).ok());

    let cfg = CoreConfig::new(store_path)?;
    let store = cfg.open_store()?;

    tracing::info!("++ Using patient store {}", cfg.store_path().display());
    tracing::info!("++ Starting PMS REST on {}", rest_addr);

    let app = api_rest::router(PatientService::new(Arc::new(store)));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
