use super::common;

use common::test_server::TestServer;
use serde_json::json;

#[tokio::test]
async fn test_health_endpoint() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["simulation"], "not_deployed");
    assert_eq!(body["checks"]["chaos"], "disabled");
    assert_eq!(body["checks"]["chaos_failure_rate"], 0.5);
    assert!(body["uptime_seconds"].is_number());
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_ready_endpoint() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/health/ready"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 503);

    client
        .post(server.url("/deploy"))
        .json(&json!({ "api_key": "k", "schema": "{\"id\": \"abc\"}" }))
        .send()
        .await
        .unwrap();

    let response = client
        .get(server.url("/health/ready"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_health_live_endpoint() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/health/live"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body = response.text().await.unwrap();
    // Should contain Prometheus metrics
    assert!(body.contains("mirage_"));
}

#[tokio::test]
async fn test_mock_endpoint_serves_fresh_objects() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let deployed: serde_json::Value = client
        .post(server.url("/deploy"))
        .json(&json!({ "api_key": "k", "schema": "{\"id\": \"abc\"}" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(deployed, json!({ "success": true }));

    let mut ids = std::collections::HashSet::new();
    for _ in 0..5 {
        let body: serde_json::Value = client
            .get(server.url("/api/mirage"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        ids.insert(body["id"].as_str().unwrap().to_string());
    }
    assert_eq!(ids.len(), 5);
}
