// src/metrics/collector.rs
use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn gather(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct MetricsCollector {
    pub requests_total: IntCounterVec,
    pub request_duration_seconds: HistogramVec,
    pub service_health_status: IntGaugeVec,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let requests_total = IntCounterVec::new(
            Opts::new(
                "directory_client_requests_total",
                "Total requests sent to the directory API",
            ),
            &["endpoint", "outcome"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "directory_client_request_duration_seconds",
                "Directory API request duration in seconds",
            ),
            &["endpoint"],
        )?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        let service_health_status = IntGaugeVec::new(
            Opts::new(
                "directory_service_health_status",
                "Last observed service health (1=healthy, 0=not healthy)",
            ),
            &["service"],
        )?;
        registry.register(Box::new(service_health_status.clone()))?;

        Ok(Self {
            requests_total,
            request_duration_seconds,
            service_health_status,
        })
    }

    pub fn record_request(&self, endpoint: &str, outcome: &str, duration: Duration) {
        self.requests_total
            .with_label_values(&[endpoint, outcome])
            .inc();

        self.request_duration_seconds
            .with_label_values(&[endpoint])
            .observe(duration.as_secs_f64());
    }

    pub fn update_service_health(&self, service: &str, healthy: bool) {
        let value = if healthy { 1 } else { 0 };
        self.service_health_status
            .with_label_values(&[service])
            .set(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gather_contains_recorded_request() {
        let registry = MetricsRegistry::new().unwrap();
        let metrics = registry.collector();

        metrics.record_request("health", "success", Duration::from_millis(12));
        metrics.record_request("health", "http_error", Duration::from_millis(3));
        metrics.update_service_health("backend", true);

        let text = registry.gather().unwrap();
        assert!(text.contains(r#"directory_client_requests_total{endpoint="health",outcome="success"} 1"#));
        assert!(text.contains(r#"directory_client_requests_total{endpoint="health",outcome="http_error"} 1"#));
        assert!(text.contains(r#"directory_service_health_status{service="backend"} 1"#));
    }
}
