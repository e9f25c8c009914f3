//! REST handlers for deploying simulations, toggling chaos and serving mocks

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, warn};

use crate::adapters::chaos::ChaosState;
use crate::adapters::metrics_handler::MetricsCollector;
use crate::adapters::registry::SimulationRegistry;
use crate::application::DeployService;
use crate::domain::{MirageError, DEFAULT_SIMULATION_KEY};

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub deploy: Arc<DeployService>,
    pub registry: SimulationRegistry,
    pub chaos: Arc<ChaosState>,
    pub metrics: Arc<MetricsCollector>,
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct DeployRequest {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub schema: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChaosRequest {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChaosResponse {
    pub success: bool,
    pub chaos: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// ============================================================================
// Deploy
// ============================================================================

/// POST /deploy
///
/// Always answers 200; failures are reported as `{"success": false, "error": ...}`.
pub async fn deploy(
    State(state): State<ApiState>,
    payload: Option<Json<DeployRequest>>,
) -> impl IntoResponse {
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    let timer = state.metrics.deploy_duration.start_timer();
    let result = state.deploy.deploy(request.api_key, request.schema).await;
    timer.observe_duration();

    match result {
        Ok(_) => {
            state.metrics.deploys_total.with_label_values(&["success"]).inc();
            (StatusCode::OK, Json(ApiResponse::ok()))
        }
        Err(e) => {
            state.metrics.deploys_total.with_label_values(&[e.kind()]).inc();
            (StatusCode::OK, Json(ApiResponse::error(e.to_string())))
        }
    }
}

// ============================================================================
// Chaos
// ============================================================================

/// POST /api/chaos
pub async fn set_chaos(
    State(state): State<ApiState>,
    payload: Option<Json<ChaosRequest>>,
) -> impl IntoResponse {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let chaos = state.chaos.set_enabled(request.enabled);
    (StatusCode::OK, Json(ChaosResponse { success: true, chaos }))
}

/// GET /api/chaos
pub async fn get_chaos(State(state): State<ApiState>) -> impl IntoResponse {
    let chaos = state.chaos.is_enabled();
    (StatusCode::OK, Json(ChaosResponse { success: true, chaos }))
}

// ============================================================================
// Mock endpoint
// ============================================================================

/// GET /api/mirage
pub async fn mirage(State(state): State<ApiState>) -> Response {
    match serve_mirage(&state).await {
        Ok(body) => {
            state.metrics.requests_total.with_label_values(&["ok"]).inc();
            (StatusCode::OK, Json(Value::Object(body))).into_response()
        }
        Err(e) => {
            state.metrics.requests_total.with_label_values(&[e.kind()]).inc();
            (e.status_code(), Json(ErrorBody { error: e.to_string() })).into_response()
        }
    }
}

async fn serve_mirage(state: &ApiState) -> Result<Map<String, Value>, MirageError> {
    let generator = state
        .registry
        .get(DEFAULT_SIMULATION_KEY)
        .await
        .ok_or(MirageError::NotDeployed)?;

    if state.chaos.should_fail() {
        warn!("Chaos mode injected a simulated failure");
        return Err(MirageError::SimulatedChaos);
    }

    // Script execution is CPU-bound; keep it off the async workers
    let result = tokio::task::spawn_blocking(move || generator.invoke())
        .await
        .map_err(|e| MirageError::GeneratorRuntime(e.to_string()))?;

    if let Err(e) = &result {
        error!("Generator failed: {}", e);
    }
    result
}
