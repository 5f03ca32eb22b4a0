pub mod auth_state;
pub mod biometric;

pub use auth_state::{AuthPhase, AuthState};
pub use biometric::{BiometricType, HardwareCapability, PromptOptions, PromptResult};
