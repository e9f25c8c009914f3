use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::adapters::chaos::ChaosState;
use crate::adapters::registry::SimulationRegistry;
use crate::domain::DEFAULT_SIMULATION_KEY;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub simulation: String,
    pub chaos: String,
    pub chaos_failure_rate: f64,
}

pub struct HealthHandler {
    registry: SimulationRegistry,
    chaos: Arc<ChaosState>,
    start_time: std::time::Instant,
}

impl HealthHandler {
    pub fn new(registry: SimulationRegistry, chaos: Arc<ChaosState>) -> Self {
        Self {
            registry,
            chaos,
            start_time: std::time::Instant::now(),
        }
    }

    /// Basic health check - returns 200 if server is running
    pub async fn health(&self) -> impl IntoResponse {
        let deployed = self.registry.is_deployed(DEFAULT_SIMULATION_KEY).await;
        let status = HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            checks: HealthChecks {
                simulation: if deployed { "deployed" } else { "not_deployed" }.to_string(),
                chaos: if self.chaos.is_enabled() { "enabled" } else { "disabled" }.to_string(),
                chaos_failure_rate: self.chaos.failure_rate(),
            },
        };

        (StatusCode::OK, Json(status))
    }

    /// Readiness check - 200 once a simulation has been deployed
    pub async fn ready(&self) -> impl IntoResponse {
        if self.registry.is_deployed(DEFAULT_SIMULATION_KEY).await {
            (StatusCode::OK, Json(serde_json::json!({
                "status": "ready",
                "message": "Simulation deployed"
            })))
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, Json(serde_json::json!({
                "status": "not_ready",
                "message": "No simulation deployed"
            })))
        }
    }

    /// Liveness check - returns 200 if server is alive
    pub async fn live(&self) -> impl IntoResponse {
        (StatusCode::OK, Json(serde_json::json!({
            "status": "alive",
            "message": "Server is alive"
        })))
    }
}
