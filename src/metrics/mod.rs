//! Metrics collection and exposition for Prometheus.
//!
//! This module provides centralized metrics recording for authentication
//! attempts and hardware probes.

mod recorder;

pub use recorder::{Metrics, MetricsRecorder};
