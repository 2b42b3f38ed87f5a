//! Constants used throughout the core crate.

/// Default location of the patient store when no explicit path is configured.
pub const DEFAULT_STORE_PATH: &str = "patients.json";

/// Environment variable naming the patient store file.
pub const STORE_PATH_ENV: &str = "PMS_STORE_PATH";

/// Environment variable naming the REST bind address.
pub const REST_ADDR_ENV: &str = "PMS_REST_ADDR";

/// Default REST bind address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";
