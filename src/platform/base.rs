use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use super::{simulated_platform::SimulatedPlatform, unavailable_platform::UnavailablePlatform};
use crate::config::PlatformConfig;
use crate::models::{HardwareCapability, PromptOptions, PromptResult};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("biometric authentication not available on this device")]
    NotAvailable,

    #[error("biometric prompt was cancelled")]
    Cancelled,

    #[error("platform error: {0}")]
    Platform(String),
}

/// The device capability behind biometric authentication.
///
/// Implementations wrap whatever the host platform offers. Both calls may
/// suspend; neither is expected to be retried by the caller.
#[async_trait]
pub trait BiometricPlatform: Send + Sync {
    /// A descriptive name for logs.
    fn get_name(&self) -> &str;

    /// Reports hardware presence and supported modalities.
    async fn probe(&self) -> Result<HardwareCapability, PlatformError>;

    /// Shows the biometric prompt and waits for the user.
    async fn prompt(&self, options: &PromptOptions) -> Result<PromptResult, PlatformError>;
}

/// Builds the platform selected in the configuration.
pub fn create_platform(config: &PlatformConfig) -> Arc<dyn BiometricPlatform> {
    match config {
        PlatformConfig::Simulated(cfg) => {
            info!(
                event_name = "platform.create",
                event_domain = "platform",
                platform_type = "simulated",
                platform_name = cfg.name.as_str(),
                "using simulated biometric platform"
            );
            Arc::new(SimulatedPlatform::new(cfg))
        }
        PlatformConfig::Unavailable => {
            info!(
                event_name = "platform.create",
                event_domain = "platform",
                platform_type = "unavailable",
                "biometric platform disabled; PIN only"
            );
            Arc::new(UnavailablePlatform::new())
        }
    }
}
