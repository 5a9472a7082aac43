//! Response DTOs for the todo API
//!
//! Defines the structure of outgoing HTTP response bodies that are not a
//! plain `Todo`.

use serde::Serialize;

/// Status reported for a healthy dependency
pub const DEPENDENCY_OK: &str = "ok";
/// Status reported for an unreachable dependency
pub const DEPENDENCY_ERROR: &str = "error";

/// Response body for DELETE /api/todos/:id
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

impl DeleteResponse {
    pub fn deleted() -> Self {
        Self {
            message: "Todo deleted successfully".to_string(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `healthy` when every dependency is reachable, otherwise `degraded`
    pub status: String,
    /// Database status (`ok` or `error`)
    pub database: String,
    /// Cache status (`ok` or `error`)
    pub redis: String,
}

impl HealthResponse {
    /// Builds the composite status from per-dependency probe results.
    pub fn from_probes(database_ok: bool, redis_ok: bool) -> Self {
        let label = |ok: bool| if ok { DEPENDENCY_OK } else { DEPENDENCY_ERROR };
        Self {
            status: if database_ok && redis_ok {
                "healthy"
            } else {
                "degraded"
            }
            .to_string(),
            database: label(database_ok).to_string(),
            redis: label(redis_ok).to_string(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
