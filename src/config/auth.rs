use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// PinConfig holds the reference PIN and the artificial verification delay.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone)]
pub struct PinConfig {
    /// The single PIN accepted by the check.
    #[serde(default = "default_reference_pin")]
    pub reference: String,
    /// Number of digits the keypad collects before submitting.
    #[serde(default = "default_pin_length")]
    pub length: usize,
    /// How long a PIN check takes to answer, in milliseconds.
    #[serde(default = "default_verify_delay_ms")]
    pub verify_delay_ms: u64,
}

fn default_reference_pin() -> String {
    "123456".to_string()
}

fn default_pin_length() -> usize {
    6
}

fn default_verify_delay_ms() -> u64 {
    1000
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            reference: default_reference_pin(),
            length: default_pin_length(),
            verify_delay_ms: default_verify_delay_ms(),
        }
    }
}

impl PinConfig {
    pub fn verify_delay(&self) -> Duration {
        Duration::from_millis(self.verify_delay_ms)
    }

    /// The reference PIN must be exactly `length` ASCII digits.
    pub fn validate(&self) -> Result<(), String> {
        if self.length == 0 {
            return Err("pin.length must be greater than zero".to_string());
        }
        if self.reference.len() != self.length {
            return Err(format!(
                "pin.reference has {} characters, expected {}",
                self.reference.len(),
                self.length
            ));
        }
        if !self.reference.chars().all(|c| c.is_ascii_digit()) {
            return Err("pin.reference must contain only digits".to_string());
        }
        Ok(())
    }
}
