use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::base::{BiometricPlatform, PlatformError};
use crate::models::{BiometricType, HardwareCapability, PromptOptions, PromptResult};

/// How the simulated prompt answers.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromptOutcome {
    #[default]
    Success,
    Failure,
    Cancel,
    /// The platform tears the prompt down itself and reports `Cancelled`.
    Dismissed,
    Error,
}

/// SimulatedPlatformConfig describes a fake device.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct SimulatedPlatformConfig {
    /// A friendly name for logs.
    pub name: String,
    #[serde(default)]
    pub has_hardware: bool,
    /// Reported modalities, in the order the platform prefers them.
    #[serde(default)]
    pub supported_types: Vec<BiometricType>,
    #[serde(default)]
    pub prompt_outcome: PromptOutcome,
    /// When set, the hardware probe itself errors.
    #[serde(default)]
    pub probe_fails: bool,
}

/// A `BiometricPlatform` that answers from its config. Used by the CLI and by
/// tests; it also counts calls so callers can check how often it was asked.
pub struct SimulatedPlatform {
    pub config: SimulatedPlatformConfig,
    probe_calls: AtomicUsize,
    prompt_calls: AtomicUsize,
}

impl SimulatedPlatform {
    pub fn new(config: &SimulatedPlatformConfig) -> Self {
        Self {
            config: config.clone(),
            probe_calls: AtomicUsize::new(0),
            prompt_calls: AtomicUsize::new(0),
        }
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub fn prompt_calls(&self) -> usize {
        self.prompt_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BiometricPlatform for SimulatedPlatform {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    async fn probe(&self) -> Result<HardwareCapability, PlatformError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        if self.config.probe_fails {
            return Err(PlatformError::Platform(
                "simulated hardware probe failure".to_string(),
            ));
        }

        Ok(HardwareCapability {
            has_hardware: self.config.has_hardware,
            supported_types: self.config.supported_types.clone(),
        })
    }

    async fn prompt(&self, options: &PromptOptions) -> Result<PromptResult, PlatformError> {
        self.prompt_calls.fetch_add(1, Ordering::SeqCst);
        debug!(
            "Simulated prompt '{}' (cancel='{}', fallback='{}')",
            options.prompt_message, options.cancel_label, options.fallback_label
        );

        match self.config.prompt_outcome {
            PromptOutcome::Success => Ok(PromptResult::success()),
            PromptOutcome::Failure => Ok(PromptResult::failure("authentication_failed")),
            PromptOutcome::Cancel => Ok(PromptResult::failure("user_cancel")),
            PromptOutcome::Dismissed => Err(PlatformError::Cancelled),
            PromptOutcome::Error => Err(PlatformError::Platform(
                "simulated prompt failure".to_string(),
            )),
        }
    }
}
