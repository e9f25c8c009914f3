//! # Mirage - LLM-generated mock data server
//!
//! Mirage turns an example JSON schema into a live mock endpoint. A language
//! model writes a small Rhai generator for the schema; Mirage sanitizes it,
//! compiles it inside a restricted engine and serves fresh objects from it on
//! every request.
//!
//! ## Features
//!
//! - **Deploy**: `POST /deploy` with a model credential and a schema
//! - **Mock endpoint**: `GET /api/mirage` returns a new object per call
//! - **Chaos Mode**: simulated 500s at a configurable probability
//! - **Sandbox**: operation, depth and size limits on every generator run
//! - **Health and Metrics**: liveness and readiness endpoints plus Prometheus counters
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mirage::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new()?;
//!     let state = mirage::build_state_for_gemini(&settings)?;
//!     let app = mirage::create_app(state);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: error taxonomy and the model invoker port
//! - **Application**: the deploy pipeline
//! - **Adapters**: HTTP handlers, Gemini client, sanitizer, compiler, fixture
//! - **Config**: layered settings and validation

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;

use crate::adapters::api_handler::{self, ApiState};
use crate::adapters::chaos::ChaosState;
use crate::adapters::compiler::GeneratorCompiler;
use crate::adapters::gemini::GeminiInvoker;
use crate::adapters::health_handler::HealthHandler;
use crate::adapters::metrics_handler::{MetricsCollector, MetricsHandler};
use crate::adapters::prompt_builder::PromptBuilder;
use crate::adapters::registry::SimulationRegistry;
use crate::application::DeployService;
use crate::config::Settings;
use crate::domain::ModelInvoker;
use axum::{routing::{get, post}, Router};
use std::sync::Arc;

/// Assembles the shared handler state around a model invoker.
pub fn build_state(settings: &Settings, invoker: Arc<dyn ModelInvoker>) -> anyhow::Result<ApiState> {
    let registry = SimulationRegistry::new();
    let deploy = DeployService::new(
        PromptBuilder::new()?,
        invoker,
        GeneratorCompiler::new(&settings.sandbox),
        registry.clone(),
    );

    Ok(ApiState {
        deploy: Arc::new(deploy),
        registry,
        chaos: Arc::new(ChaosState::from_settings(&settings.chaos)),
        metrics: Arc::new(MetricsCollector::new()?),
    })
}

/// [`build_state`] with the Gemini client configured from `settings.model`.
pub fn build_state_for_gemini(settings: &Settings) -> anyhow::Result<ApiState> {
    let invoker = GeminiInvoker::new(&settings.model)?;
    build_state(settings, Arc::new(invoker))
}

/// Creates the Axum application router with all endpoints configured.
///
/// # Arguments
///
/// * `state` - Shared state from [`build_state`]
///
/// # Returns
///
/// Configured Axum Router
pub fn create_app(state: ApiState) -> Router {
    let health_handler = Arc::new(HealthHandler::new(state.registry.clone(), state.chaos.clone()));
    let metrics_handler = Arc::new(MetricsHandler::new(state.metrics.clone()));

    let health_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }))
        .route("/metrics", get({
            let handler = metrics_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.metrics().await }
            }
        }));

    let api_router = Router::new()
        .route("/deploy", post(api_handler::deploy))
        .route("/api/chaos", get(api_handler::get_chaos).post(api_handler::set_chaos))
        .route("/api/mirage", get(api_handler::mirage))
        .with_state(state);

    health_router.merge(api_router).layer(
        tower_http::cors::CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
