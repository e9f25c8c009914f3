use prometheus::{CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::sync::Arc;

pub struct MetricsCollector {
    registry: Registry,

    // Deploy metrics
    pub deploys_total: CounterVec,
    pub deploy_duration: Histogram,

    // Mock endpoint metrics
    pub requests_total: CounterVec,
}

impl MetricsCollector {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let deploys_total = CounterVec::new(
            Opts::new("mirage_deploys_total", "Total deploy attempts by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(deploys_total.clone()))?;

        let deploy_duration = Histogram::with_opts(
            HistogramOpts::new(
                "mirage_deploy_duration_seconds",
                "Deploy duration in seconds, model call included",
            )
            .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;
        registry.register(Box::new(deploy_duration.clone()))?;

        let requests_total = CounterVec::new(
            Opts::new("mirage_requests_total", "Total mock endpoint requests by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        Ok(Self {
            registry,
            deploys_total,
            deploy_duration,
            requests_total,
        })
    }

    pub fn encode(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct MetricsHandler {
    collector: Arc<MetricsCollector>,
}

impl MetricsHandler {
    pub fn new(collector: Arc<MetricsCollector>) -> Self {
        Self { collector }
    }

    pub async fn metrics(&self) -> String {
        self.collector.encode().unwrap_or_else(|e| {
            tracing::error!("Failed to encode metrics: {}", e);
            String::from("# Error encoding metrics\n")
        })
    }
}
