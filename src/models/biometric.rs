use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A biometric modality reported by the platform.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BiometricType {
    Fingerprint,
    FacialRecognition,
    Iris,
}

/// What a hardware probe reports: presence plus supported modalities,
/// ordered by the platform's preference.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct HardwareCapability {
    pub has_hardware: bool,
    pub supported_types: Vec<BiometricType>,
}

impl HardwareCapability {
    /// The capability of a device without biometric hardware.
    pub fn none() -> Self {
        Self::default()
    }

    /// The first supported modality, if any.
    pub fn primary_type(&self) -> Option<BiometricType> {
        self.supported_types.first().copied()
    }
}

/// Labels shown by the platform biometric prompt.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct PromptOptions {
    pub prompt_message: String,
    pub cancel_label: String,
    pub fallback_label: String,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            prompt_message: "Autentícate para acceder a TUBANK".to_string(),
            cancel_label: "Cancelar".to_string(),
            fallback_label: "Usar PIN".to_string(),
        }
    }
}

/// Outcome of a platform biometric prompt.
///
/// `error` carries the platform's reason code (e.g. `user_cancel`) when
/// `success` is false. It is only used for logs and metrics.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PromptResult {
    pub success: bool,
    pub error: Option<String>,
}

impl PromptResult {
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_type_is_first_reported() {
        let capability = HardwareCapability {
            has_hardware: true,
            supported_types: vec![BiometricType::FacialRecognition, BiometricType::Fingerprint],
        };
        assert_eq!(capability.primary_type(), Some(BiometricType::FacialRecognition));
        assert_eq!(HardwareCapability::none().primary_type(), None);
    }

    #[test]
    fn test_biometric_type_serializes_kebab_case() {
        let json = serde_json::to_string(&BiometricType::FacialRecognition).unwrap();
        assert_eq!(json, "\"facial-recognition\"");
        let parsed: BiometricType = serde_json::from_str("\"iris\"").unwrap();
        assert_eq!(parsed, BiometricType::Iris);
    }

    #[test]
    fn test_default_prompt_labels() {
        let options = PromptOptions::default();
        assert_eq!(options.cancel_label, "Cancelar");
        assert_eq!(options.fallback_label, "Usar PIN");
        assert!(options.prompt_message.contains("TUBANK"));
    }
}
