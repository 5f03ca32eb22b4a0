use serde::{Deserialize, Serialize};

use super::biometric::BiometricType;

/// Read-only snapshot of the local authentication state, as handed to the
/// presentation layer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub has_hardware: bool,
    pub biometric_type: Option<BiometricType>,
}

/// Where the state machine currently is.
///
/// `Uninitialized -> Probing -> Ready -> Checking -> Authenticated | Ready`,
/// and `Authenticated -> Ready` on logout.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    Uninitialized,
    Probing,
    Ready,
    Checking,
    Authenticated,
}

impl AuthPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthPhase::Uninitialized => "uninitialized",
            AuthPhase::Probing => "probing",
            AuthPhase::Ready => "ready",
            AuthPhase::Checking => "checking",
            AuthPhase::Authenticated => "authenticated",
        }
    }
}
