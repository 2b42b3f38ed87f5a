use crate::messages::{HealthRes, InfoRes};

/// Static informational service shared by the API surfaces.
///
/// None of these payloads touch the patient store.
#[derive(Clone, Default)]
pub struct InfoService;

impl InfoService {
    /// Payload for the API root.
    pub fn root() -> InfoRes {
        InfoRes {
            message: "Patient Management System API.".into(),
        }
    }

    /// Payload describing the API.
    pub fn about() -> InfoRes {
        InfoRes {
            message: "A fully functional API to manage Patients Records.".into(),
        }
    }

    /// Liveness check for monitoring and load balancers.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "PMS is alive".into(),
        }
    }
}
