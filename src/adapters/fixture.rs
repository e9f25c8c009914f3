//! Standalone inventory fixture served by the `shadow-server` binary
//!
//! Shares nothing with the Mirage server. Every call to `GET /data` either
//! fails outright or returns a freshly generated inventory record.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Duration, Local};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::config::FixtureSettings;

pub const FIXTURE_ERROR: &str = "Internal Server Error - Chaos Mode Activated";

pub const WAREHOUSE_LOCATIONS: [&str; 8] = [
    "Zone-A",
    "Zone-B",
    "Zone-C",
    "Zone-D",
    "Warehouse-X",
    "Warehouse-Y",
    "Storage-1",
    "Storage-2",
];

pub const STOCK_STATUSES: [&str; 6] = [
    "IN_STOCK",
    "LOW_STOCK",
    "OUT_OF_STOCK",
    "BACKORDERED",
    "SHIPPING",
    "DELIVERED",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimensions {
    pub h: u32,
    pub w: u32,
    pub l: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub product_id: String,
    pub stock_level: u32,
    pub warehouse_location: String,
    pub next_shipment: String,
    pub status: String,
    pub dimensions: Dimensions,
}

impl InventoryRecord {
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let shipment = Local::now().date_naive() + Duration::days(rng.gen_range(1..=365));

        Self {
            product_id: format!("sku_{}", rng.gen_range(1000..=9999)),
            stock_level: rng.gen_range(0..=1000),
            warehouse_location: pick(&mut rng, &WAREHOUSE_LOCATIONS),
            next_shipment: shipment.format("%Y-%m-%d").to_string(),
            status: pick(&mut rng, &STOCK_STATUSES),
            dimensions: Dimensions {
                h: rng.gen_range(5..=100),
                w: rng.gen_range(5..=100),
                l: rng.gen_range(5..=100),
            },
        }
    }
}

fn pick<R: Rng>(rng: &mut R, options: &[&str]) -> String {
    options.choose(rng).copied().unwrap_or_default().to_string()
}

#[derive(Debug, Clone)]
pub struct FixtureState {
    pub failure_rate: f64,
}

/// GET /data
pub async fn inventory(State(state): State<Arc<FixtureState>>) -> Response {
    if rand::thread_rng().gen::<f64>() < state.failure_rate {
        warn!("Fixture injected a failure");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": FIXTURE_ERROR })),
        )
            .into_response();
    }

    (StatusCode::OK, Json(InventoryRecord::random())).into_response()
}

pub fn create_fixture_app(settings: &FixtureSettings) -> Router {
    let state = Arc::new(FixtureState {
        failure_rate: settings.failure_rate,
    });

    Router::new()
        .route("/data", get(inventory))
        .with_state(state)
}
