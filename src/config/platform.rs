use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::platform::SimulatedPlatformConfig;

/// The biometric platform backends. We differentiate them via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone, Default)]
#[serde(tag = "type")]
pub enum PlatformConfig {
    #[serde(rename = "simulated")]
    Simulated(SimulatedPlatformConfig),
    #[default]
    #[serde(rename = "unavailable")]
    Unavailable,
}

