use super::common;

use common::test_server::TestServer;
use mirage::adapters::fixture::{InventoryRecord, FIXTURE_ERROR};

#[tokio::test]
async fn test_fixture_always_serves_records_without_failures() {
    let server = TestServer::fixture(0.0).await;
    let client = reqwest::Client::new();

    for _ in 0..20 {
        let response = client.get(server.url("/data")).send().await.unwrap();
        assert_eq!(response.status(), 200);

        let record: InventoryRecord = response.json().await.unwrap();
        assert!(record.product_id.starts_with("sku_"));
        assert_eq!(record.next_shipment.len(), 10);
    }
}

#[tokio::test]
async fn test_fixture_failure_body() {
    let server = TestServer::fixture(1.0).await;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/data")).send().await.unwrap();
    assert_eq!(response.status(), 500);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], FIXTURE_ERROR);
}

#[tokio::test]
async fn test_fixture_fails_about_fifteen_percent() {
    let server = TestServer::fixture(0.15).await;
    let client = reqwest::Client::new();

    let trials = 600;
    let mut failures = 0;
    for _ in 0..trials {
        let response = client.get(server.url("/data")).send().await.unwrap();
        if response.status() == 500 {
            failures += 1;
        }
    }

    let rate = failures as f64 / trials as f64;
    assert!((0.07..=0.25).contains(&rate), "failure rate {}", rate);
}
