use async_trait::async_trait;
use mirage::adapters::fixture::create_fixture_app;
use mirage::config::{FixtureSettings, Settings};
use mirage::domain::ModelInvoker;
use secrecy::SecretString;
use std::net::SocketAddr;
use std::sync::Arc;

/// Model stand-in that always writes the same generator
pub struct FixedModel(pub &'static str);

#[async_trait]
impl ModelInvoker for FixedModel {
    async fn invoke(&self, _credential: &SecretString, _prompt: &str) -> String {
        self.0.to_string()
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
}

impl TestServer {
    pub async fn new() -> Self {
        Self::with_model(FixedModel("let data = #{ id: uuid::v4() };\nreturn data;")).await
    }

    pub async fn with_model(model: FixedModel) -> Self {
        let settings = Settings::default();
        let state = mirage::build_state(&settings, Arc::new(model)).unwrap();
        Self::serve(mirage::create_app(state)).await
    }

    pub async fn fixture(failure_rate: f64) -> Self {
        let settings = FixtureSettings {
            failure_rate,
            ..FixtureSettings::default()
        };
        Self::serve(create_fixture_app(&settings)).await
    }

    async fn serve(app: axum::Router) -> Self {
        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer { addr, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
