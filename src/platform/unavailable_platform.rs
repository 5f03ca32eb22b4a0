use async_trait::async_trait;
use tracing::debug;

use super::base::{BiometricPlatform, PlatformError};
use crate::models::{HardwareCapability, PromptOptions, PromptResult};

/// A platform with no biometric hardware. Probes report nothing and prompts
/// always fail with `NotAvailable`.
#[derive(Default)]
pub struct UnavailablePlatform {}

impl UnavailablePlatform {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl BiometricPlatform for UnavailablePlatform {
    fn get_name(&self) -> &str {
        "unavailable"
    }

    async fn probe(&self) -> Result<HardwareCapability, PlatformError> {
        debug!("Probe on unavailable platform; reporting no hardware.");
        Ok(HardwareCapability::none())
    }

    async fn prompt(&self, _options: &PromptOptions) -> Result<PromptResult, PlatformError> {
        debug!("Prompt requested on unavailable platform.");
        Err(PlatformError::NotAvailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_reports_no_hardware() {
        let platform = UnavailablePlatform::new();
        let capability = platform.probe().await.unwrap();
        assert!(!capability.has_hardware);
        assert!(capability.supported_types.is_empty());
    }

    #[tokio::test]
    async fn test_prompt_is_not_available() {
        let platform = UnavailablePlatform::new();
        let result = platform.prompt(&PromptOptions::default()).await;
        assert_eq!(result, Err(PlatformError::NotAvailable));
    }
}
