pub mod base;
pub mod simulated_platform;
pub mod unavailable_platform;

pub use base::{create_platform, BiometricPlatform, PlatformError};
pub use simulated_platform::{PromptOutcome, SimulatedPlatform, SimulatedPlatformConfig};
pub use unavailable_platform::UnavailablePlatform;
