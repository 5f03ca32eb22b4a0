//! Shared session state.
//!
//! Bundles what the keypad session needs: the loaded configuration, the
//! authentication state machine and the metrics registry it records into.

use crate::auth::LocalAuth;
use crate::config::ConfigV1;
use crate::metrics::Metrics;
use std::sync::Arc;

/// State shared by everything that drives one app session.
#[derive(Clone)]
pub struct SessionState {
    /// Configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// The local authentication state machine for this session.
    pub auth: Arc<LocalAuth>,
    /// Registry shared with `auth`; rendered by the `metrics` command.
    pub metrics: Metrics,
}

impl SessionState {
    pub fn new(config: Arc<ConfigV1>, auth: Arc<LocalAuth>) -> Self {
        let metrics = auth.metrics().clone();
        Self {
            config,
            auth,
            metrics,
        }
    }

    /// Build a fresh session from configuration alone.
    pub fn from_config(config: Arc<ConfigV1>) -> Self {
        let metrics = Metrics::new();
        let auth = Arc::new(LocalAuth::from_config(&config).with_metrics(metrics.clone()));
        Self {
            config,
            auth,
            metrics,
        }
    }
}
