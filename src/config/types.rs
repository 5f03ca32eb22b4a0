use std::path::Path;

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::auth::PinConfig;
use super::logging::LoggingConfig;
use super::platform::PlatformConfig;
use crate::models::PromptOptions;

/// Prefix for environment overrides, e.g. `TUBANK_AUTH_PIN__VERIFY_DELAY_MS=0`.
pub const ENV_PREFIX: &str = "TUBANK_AUTH_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: logging, PIN check, biometric prompt labels and platform.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone, Default)]
pub struct ConfigV1 {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub pin: PinConfig,
    #[serde(default)]
    pub biometric: PromptOptions,
    #[serde(default)]
    pub platform: PlatformConfig,
}

impl ConfigV1 {
    pub fn validate(&self) -> Result<(), String> {
        self.pin.validate()
    }
}

/// Build the figment for a YAML file plus environment overrides.
pub fn figment_for(path: impl AsRef<Path>) -> Figment {
    Figment::new()
        .merge(Yaml::file(path.as_ref()))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Extract and validate a `ConfigV1` from any figment.
pub fn extract_config(figment: &Figment) -> Result<ConfigV1, String> {
    let config = figment
        .extract::<Config>()
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let config = match config {
        Config::ConfigV1(c) => c,
    };
    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {}", e))?;
    Ok(config)
}

/// Load config from a YAML file, exiting the process if it cannot be used.
pub fn load_config(path: impl AsRef<Path>) -> ConfigV1 {
    match extract_config(&figment_for(path)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
