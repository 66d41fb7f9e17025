// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Collaborator calls (outcome, latency) per service
// - Aggregation batches
// - Outbound dispatches by kind and outcome
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the service
pub struct Metrics {
    registry: Registry,

    // Collaborator Metrics
    pub remote_calls: IntCounterVec,
    pub remote_call_duration: HistogramVec,

    // Core Metrics
    pub aggregations: IntCounterVec,
    pub dispatches: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let remote_calls = IntCounterVec::new(
            Opts::new("remote_calls_total", "Total calls made to collaborator services"),
            &["service", "outcome"],
        )?;
        registry.register(Box::new(remote_calls.clone()))?;

        let remote_call_duration = HistogramVec::new(
            HistogramOpts::new("remote_call_duration_seconds", "Collaborator call duration")
                .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]),
            &["service"],
        )?;
        registry.register(Box::new(remote_call_duration.clone()))?;

        let aggregations = IntCounterVec::new(
            Opts::new("aggregations_total", "Total aggregation batches"),
            &["outcome"],
        )?;
        registry.register(Box::new(aggregations.clone()))?;

        let dispatches = IntCounterVec::new(
            Opts::new("dispatches_total", "Total outbound order dispatches"),
            &["kind", "outcome"],
        )?;
        registry.register(Box::new(dispatches.clone()))?;

        Ok(Self {
            registry,
            remote_calls,
            remote_call_duration,
            aggregations,
            dispatches,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record one collaborator call
    pub fn record_remote_call(&self, service: &str, duration_secs: f64, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.remote_calls.with_label_values(&[service, outcome]).inc();
        self.remote_call_duration.with_label_values(&[service]).observe(duration_secs);
    }

    pub fn record_aggregation(&self, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.aggregations.with_label_values(&[outcome]).inc();
    }

    pub fn record_dispatch(&self, kind: &str, outcome: &str) {
        self.dispatches.with_label_values(&[kind, outcome]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        metrics.record_aggregation(true);
        assert!(!metrics.registry.gather().is_empty());
    }

    #[test]
    fn test_record_remote_call() {
        let metrics = Metrics::new().unwrap();
        metrics.record_remote_call("directory", 0.05, true);
        metrics.record_remote_call("directory", 0.20, false);
        metrics.record_remote_call("cart", 0.01, true);

        let gathered = metrics.registry.gather();
        let calls = gathered.iter().find(|m| m.name() == "remote_calls_total").unwrap();
        assert_eq!(calls.metric.len(), 3); // directory/success, directory/failure, cart/success
    }

    #[test]
    fn test_record_dispatch() {
        let metrics = Metrics::new().unwrap();
        metrics.record_dispatch("shipping", "delivered");
        metrics.record_dispatch("shipping", "delivered");

        let gathered = metrics.registry.gather();
        let dispatches = gathered.iter().find(|m| m.name() == "dispatches_total").unwrap();
        assert_eq!(dispatches.metric[0].counter.value, Some(2.0));
    }
}
