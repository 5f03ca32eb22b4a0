//! Metrics recording implementation using Prometheus.

use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    Encoder, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Trait for recording application metrics.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Records an authentication attempt (`pin` or `biometric`) with its outcome.
    fn record_auth_attempt(&self, method: &str, result: &str);

    /// Records how long a completed check took.
    fn record_auth_duration(&self, method: &str, duration_secs: f64);

    /// Records the outcome of a hardware probe.
    fn record_hardware_probe(&self, result: &str);
}

/// Prometheus metrics collector.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    auth_attempts_total: CounterVec,
    auth_check_duration_seconds: HistogramVec,
    hardware_probe_total: CounterVec,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Creates a new metrics instance with its own Prometheus registry.
    pub fn new() -> Self {
        let registry = Arc::new(Registry::new());

        let auth_attempts_total = register_counter_vec_with_registry!(
            Opts::new(
                "auth_attempts_total",
                "Total number of local authentication attempts"
            ),
            &["method", "result"],
            registry.clone()
        )
        .expect("Failed to register auth_attempts_total");

        let auth_check_duration_seconds = register_histogram_vec_with_registry!(
            "auth_check_duration_seconds",
            "Duration of completed authentication checks in seconds",
            &["method"],
            vec![0.001, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 1.5, 2.5, 5.0, 10.0, 30.0],
            registry.clone()
        )
        .expect("Failed to register auth_check_duration_seconds");

        let hardware_probe_total = register_counter_vec_with_registry!(
            Opts::new(
                "biometric_probe_total",
                "Total biometric hardware probes by outcome"
            ),
            &["result"],
            registry.clone()
        )
        .expect("Failed to register biometric_probe_total");

        Metrics {
            registry,
            auth_attempts_total,
            auth_check_duration_seconds,
            hardware_probe_total,
        }
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            return format!("# failed to encode metrics: {}\n", e);
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Current value of `auth_attempts_total` for one label pair.
    pub fn auth_attempts(&self, method: &str, result: &str) -> u64 {
        self.auth_attempts_total
            .with_label_values(&[method, result])
            .get() as u64
    }
}

impl MetricsRecorder for Metrics {
    fn record_auth_attempt(&self, method: &str, result: &str) {
        self.auth_attempts_total
            .with_label_values(&[method, result])
            .inc();
    }

    fn record_auth_duration(&self, method: &str, duration_secs: f64) {
        self.auth_check_duration_seconds
            .with_label_values(&[method])
            .observe(duration_secs);
    }

    fn record_hardware_probe(&self, result: &str) {
        self.hardware_probe_total.with_label_values(&[result]).inc();
    }
}
