use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{ConfigV1, PinConfig};
use crate::delay::{Delay, TokioDelay};
use crate::metrics::{Metrics, MetricsRecorder};
use crate::models::{AuthPhase, AuthState, BiometricType, PromptOptions};
use crate::platform::{create_platform, BiometricPlatform, PlatformError};
use crate::utils::log_throttle::LogThrottle;

const REJECTED_LOG_WINDOW: Duration = Duration::from_secs(30);

/// Platform reason codes that mean the user (or the OS on their behalf)
/// dismissed the prompt.
const CANCEL_REASONS: [&str; 3] = ["user_cancel", "system_cancel", "app_cancel"];

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// A probe or another check is still running; the new attempt was dropped.
    #[error("an authentication attempt is already in flight")]
    AttemptInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeStatus {
    NotStarted,
    InFlight,
    Done,
}

#[derive(Debug)]
struct Inner {
    is_authenticated: bool,
    has_hardware: bool,
    biometric_type: Option<BiometricType>,
    probe: ProbeStatus,
    checking: bool,
    /// Bumped on every logout; a check only applies its result to the
    /// generation it started in.
    generation: u64,
}

impl Inner {
    fn snapshot(&self) -> AuthState {
        AuthState {
            is_authenticated: self.is_authenticated,
            is_loading: self.checking || self.probe == ProbeStatus::InFlight,
            has_hardware: self.has_hardware,
            biometric_type: self.biometric_type,
        }
    }

    fn phase(&self) -> AuthPhase {
        if self.probe == ProbeStatus::InFlight {
            AuthPhase::Probing
        } else if self.checking {
            AuthPhase::Checking
        } else if self.is_authenticated {
            AuthPhase::Authenticated
        } else if self.probe == ProbeStatus::NotStarted {
            AuthPhase::Uninitialized
        } else {
            AuthPhase::Ready
        }
    }
}

/// Clears the in-flight check flag when the attempt finishes or its future is dropped.
struct CheckGuard<'a> {
    inner: &'a Mutex<Inner>,
    generation: u64,
}

impl CheckGuard<'_> {
    /// Mark the session authenticated unless a logout happened since the
    /// check began. Returns whether the session was granted.
    fn grant(&self) -> bool {
        let mut inner = lock(self.inner);
        if inner.generation != self.generation {
            return false;
        }
        inner.is_authenticated = true;
        true
    }
}

impl Drop for CheckGuard<'_> {
    fn drop(&mut self) {
        lock(self.inner).checking = false;
    }
}

/// Resets an unfinished probe so a dropped probe future does not leave the
/// machine stuck in `Probing`.
struct ProbeGuard<'a> {
    inner: &'a Mutex<Inner>,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        let mut inner = lock(self.inner);
        if inner.probe == ProbeStatus::InFlight {
            inner.probe = ProbeStatus::NotStarted;
        }
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The local authentication state machine.
///
/// Holds the per-session [`AuthState`] and serializes credential checks: while
/// the hardware probe or a PIN/biometric check is running, further
/// `submit_*` calls fail fast with [`AuthError::AttemptInFlight`].
pub struct LocalAuth {
    platform: Arc<dyn BiometricPlatform>,
    delay: Arc<dyn Delay>,
    reference_pin: String,
    verify_delay: Duration,
    prompt_options: PromptOptions,
    metrics: Metrics,
    throttle: LogThrottle,
    inner: Mutex<Inner>,
}

impl LocalAuth {
    pub fn new(
        platform: Arc<dyn BiometricPlatform>,
        delay: Arc<dyn Delay>,
        pin_config: &PinConfig,
        prompt_options: PromptOptions,
    ) -> Self {
        Self {
            platform,
            delay,
            reference_pin: pin_config.reference.clone(),
            verify_delay: pin_config.verify_delay(),
            prompt_options,
            metrics: Metrics::new(),
            throttle: LogThrottle::new(REJECTED_LOG_WINDOW),
            inner: Mutex::new(Inner {
                is_authenticated: false,
                has_hardware: false,
                biometric_type: None,
                probe: ProbeStatus::NotStarted,
                checking: false,
                generation: 0,
            }),
        }
    }

    /// Wire up the configured platform with the real tokio timer.
    pub fn from_config(config: &ConfigV1) -> Self {
        info!("Creating local authentication...");
        Self::new(
            create_platform(&config.platform),
            Arc::new(TokioDelay),
            &config.pin,
            config.biometric.clone(),
        )
    }

    /// Replace the metrics sink, e.g. to share one registry between instances.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn platform_name(&self) -> &str {
        self.platform.get_name()
    }

    pub fn snapshot(&self) -> AuthState {
        lock(&self.inner).snapshot()
    }

    pub fn phase(&self) -> AuthPhase {
        lock(&self.inner).phase()
    }

    pub fn is_authenticated(&self) -> bool {
        lock(&self.inner).is_authenticated
    }

    /// Ask the platform for biometric hardware. Runs once per instance; later
    /// calls return the stored result without touching the platform. A probe
    /// error is logged and treated as "no hardware".
    pub async fn probe_hardware(&self) -> AuthState {
        {
            let mut inner = lock(&self.inner);
            if inner.probe != ProbeStatus::NotStarted {
                debug!("Hardware already probed (status {:?}); skipping.", inner.probe);
                return inner.snapshot();
            }
            inner.probe = ProbeStatus::InFlight;
        }
        let _guard = ProbeGuard { inner: &self.inner };

        let result = self.platform.probe().await;

        let mut inner = lock(&self.inner);
        match result {
            Ok(capability) => {
                inner.has_hardware = capability.has_hardware;
                inner.biometric_type = capability.primary_type();
                self.metrics.record_hardware_probe(if capability.has_hardware {
                    "hardware"
                } else {
                    "no_hardware"
                });
                info!(
                    event_name = "auth.probe.completed",
                    event_domain = "auth",
                    platform_name = self.platform.get_name(),
                    has_hardware = capability.has_hardware,
                    biometric_type = ?inner.biometric_type,
                    "biometric hardware probe completed"
                );
            }
            Err(e) => {
                inner.has_hardware = false;
                inner.biometric_type = None;
                self.metrics.record_hardware_probe("error");
                warn!(
                    event_name = "auth.probe.failed",
                    event_domain = "auth",
                    platform_name = self.platform.get_name(),
                    error = %e,
                    "biometric hardware probe failed; continuing with PIN only"
                );
            }
        }
        inner.probe = ProbeStatus::Done;
        inner.snapshot()
    }

    /// Check a completed PIN against the reference after the configured delay.
    ///
    /// The candidate's shape is the caller's concern (the keypad only submits
    /// full-length entries). A mismatch leaves the state untouched.
    pub async fn submit_pin(&self, candidate: &str) -> Result<bool, AuthError> {
        let guard = self.begin_attempt("pin")?;
        let attempt_id = Uuid::new_v4();
        let started = Instant::now();
        debug!(
            event_name = "auth.pin.started",
            event_domain = "auth",
            attempt_id = %attempt_id,
            "PIN check started"
        );

        self.delay.wait(self.verify_delay).await;

        let is_valid = candidate == self.reference_pin;
        if is_valid {
            if !guard.grant() {
                self.log_stale_success("pin", attempt_id);
            }
            self.metrics.record_auth_attempt("pin", "success");
            info!(
                event_name = "auth.pin.accepted",
                event_domain = "auth",
                attempt_id = %attempt_id,
                "PIN accepted"
            );
        } else {
            self.metrics.record_auth_attempt("pin", "failure");
            if let Some(suppressed_count) = self.throttle.should_emit("auth.pin.rejected") {
                warn!(
                    event_name = "auth.pin.rejected",
                    event_domain = "auth",
                    attempt_id = %attempt_id,
                    suppressed_count,
                    "incorrect PIN"
                );
            }
        }
        self.metrics
            .record_auth_duration("pin", started.elapsed().as_secs_f64());

        Ok(is_valid)
    }

    /// Run the platform biometric prompt. Any outcome other than platform
    /// success, including errors, yields `Ok(false)` and leaves the state as is.
    pub async fn submit_biometric(&self) -> Result<bool, AuthError> {
        let guard = self.begin_attempt("biometric")?;
        let attempt_id = Uuid::new_v4();
        let started = Instant::now();
        debug!(
            event_name = "auth.biometric.started",
            event_domain = "auth",
            attempt_id = %attempt_id,
            platform_name = self.platform.get_name(),
            "biometric prompt requested"
        );

        let accepted = match self.platform.prompt(&self.prompt_options).await {
            Ok(result) if result.success => {
                if !guard.grant() {
                    self.log_stale_success("biometric", attempt_id);
                }
                self.metrics.record_auth_attempt("biometric", "success");
                info!(
                    event_name = "auth.biometric.accepted",
                    event_domain = "auth",
                    attempt_id = %attempt_id,
                    "biometric authentication succeeded"
                );
                true
            }
            Ok(result) => {
                let reason = result.error.as_deref().unwrap_or("unknown");
                let label = if CANCEL_REASONS.contains(&reason) {
                    "cancelled"
                } else {
                    "failure"
                };
                self.metrics.record_auth_attempt("biometric", label);
                if let Some(suppressed_count) = self.throttle.should_emit("auth.biometric.rejected")
                {
                    warn!(
                        event_name = "auth.biometric.rejected",
                        event_domain = "auth",
                        attempt_id = %attempt_id,
                        reason,
                        suppressed_count,
                        "biometric authentication not granted"
                    );
                }
                false
            }
            Err(e) => {
                let label = match e {
                    PlatformError::Cancelled => "cancelled",
                    _ => "error",
                };
                self.metrics.record_auth_attempt("biometric", label);
                warn!(
                    event_name = "auth.biometric.error",
                    event_domain = "auth",
                    attempt_id = %attempt_id,
                    error = %e,
                    "biometric prompt failed"
                );
                false
            }
        };
        self.metrics
            .record_auth_duration("biometric", started.elapsed().as_secs_f64());

        Ok(accepted)
    }

    /// Drop the authenticated flag. Probed hardware values are kept. A check
    /// still running when this is called can no longer authenticate the session.
    pub fn logout(&self) {
        let mut inner = lock(&self.inner);
        inner.generation = inner.generation.wrapping_add(1);
        if inner.is_authenticated {
            info!(
                event_name = "auth.logout",
                event_domain = "auth",
                "session logged out"
            );
        }
        inner.is_authenticated = false;
    }

    fn begin_attempt(&self, method: &'static str) -> Result<CheckGuard<'_>, AuthError> {
        let mut inner = lock(&self.inner);
        if inner.checking || inner.probe == ProbeStatus::InFlight {
            self.metrics.record_auth_attempt(method, "rejected");
            debug!(
                event_name = "auth.attempt.rejected",
                event_domain = "auth",
                method,
                phase = inner.phase().as_str(),
                "attempt rejected while another is in flight"
            );
            return Err(AuthError::AttemptInFlight);
        }
        inner.checking = true;
        Ok(CheckGuard {
            inner: &self.inner,
            generation: inner.generation,
        })
    }

    fn log_stale_success(&self, method: &'static str, attempt_id: Uuid) {
        info!(
            event_name = "auth.attempt.discarded",
            event_domain = "auth",
            method,
            attempt_id = %attempt_id,
            "credential accepted after logout; session stays signed out"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::NoDelay;
    use crate::platform::{
        PromptOutcome, SimulatedPlatform, SimulatedPlatformConfig, UnavailablePlatform,
    };

    fn simulated(outcome: PromptOutcome, probe_fails: bool) -> Arc<SimulatedPlatform> {
        Arc::new(SimulatedPlatform::new(&SimulatedPlatformConfig {
            name: "unit".to_string(),
            has_hardware: true,
            supported_types: vec![BiometricType::Fingerprint],
            prompt_outcome: outcome,
            probe_fails,
        }))
    }

    fn auth_with(platform: Arc<dyn BiometricPlatform>) -> LocalAuth {
        LocalAuth::new(
            platform,
            Arc::new(NoDelay),
            &PinConfig::default(),
            PromptOptions::default(),
        )
    }

    #[test]
    fn test_fresh_state_is_unauthenticated_and_idle() {
        let auth = auth_with(Arc::new(UnavailablePlatform::new()));
        assert_eq!(auth.snapshot(), AuthState::default());
        assert_eq!(auth.phase(), AuthPhase::Uninitialized);
    }

    #[tokio::test]
    async fn test_correct_pin_authenticates() {
        let auth = auth_with(Arc::new(UnavailablePlatform::new()));
        auth.probe_hardware().await;

        assert_eq!(auth.submit_pin("123456").await, Ok(true));
        assert!(auth.is_authenticated());
        assert!(!auth.snapshot().is_loading);
        assert_eq!(auth.phase(), AuthPhase::Authenticated);
        assert_eq!(auth.metrics().auth_attempts("pin", "success"), 1);
    }

    #[tokio::test]
    async fn test_wrong_pins_are_rejected() {
        let auth = auth_with(Arc::new(UnavailablePlatform::new()));
        for candidate in ["000000", "123457", "12345", "1234567", "", "abcdef"] {
            assert_eq!(auth.submit_pin(candidate).await, Ok(false), "{candidate}");
            assert!(!auth.is_authenticated());
        }
        assert_eq!(auth.metrics().auth_attempts("pin", "failure"), 6);
    }

    #[tokio::test]
    async fn test_wrong_pin_keeps_existing_session() {
        let auth = auth_with(Arc::new(UnavailablePlatform::new()));
        assert_eq!(auth.submit_pin("123456").await, Ok(true));
        assert_eq!(auth.submit_pin("999999").await, Ok(false));
        assert!(auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_authentication_but_keeps_hardware() {
        let platform = simulated(PromptOutcome::Success, false);
        let auth = auth_with(platform.clone());
        auth.probe_hardware().await;
        assert_eq!(auth.submit_biometric().await, Ok(true));

        auth.logout();

        let state = auth.snapshot();
        assert!(!state.is_authenticated);
        assert!(state.has_hardware);
        assert_eq!(state.biometric_type, Some(BiometricType::Fingerprint));
        assert_eq!(auth.phase(), AuthPhase::Ready);

        // Logging out twice is harmless.
        auth.logout();
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_probe_runs_once() {
        let platform = simulated(PromptOutcome::Success, false);
        let auth = auth_with(platform.clone());

        let first = auth.probe_hardware().await;
        let second = auth.probe_hardware().await;

        assert_eq!(first, second);
        assert_eq!(platform.probe_calls(), 1);
    }

    #[tokio::test]
    async fn test_probe_error_means_no_hardware() {
        let auth = auth_with(simulated(PromptOutcome::Success, true));
        let state = auth.probe_hardware().await;

        assert!(!state.has_hardware);
        assert_eq!(state.biometric_type, None);
        assert!(!state.is_loading);
        assert_eq!(auth.phase(), AuthPhase::Ready);
    }

    #[tokio::test]
    async fn test_biometric_failure_modes_return_false() {
        for outcome in [
            PromptOutcome::Failure,
            PromptOutcome::Cancel,
            PromptOutcome::Dismissed,
            PromptOutcome::Error,
        ] {
            let auth = auth_with(simulated(outcome, false));
            auth.probe_hardware().await;
            assert_eq!(auth.submit_biometric().await, Ok(false), "{outcome:?}");
            assert!(!auth.is_authenticated());
            assert!(!auth.snapshot().is_loading);
        }
    }

    #[tokio::test]
    async fn test_biometric_outcomes_are_labelled() {
        let cancelled = auth_with(simulated(PromptOutcome::Cancel, false));
        cancelled.submit_biometric().await.unwrap();
        assert_eq!(cancelled.metrics().auth_attempts("biometric", "cancelled"), 1);

        let dismissed = auth_with(simulated(PromptOutcome::Dismissed, false));
        assert_eq!(dismissed.submit_biometric().await, Ok(false));
        assert_eq!(dismissed.metrics().auth_attempts("biometric", "cancelled"), 1);
        assert_eq!(dismissed.metrics().auth_attempts("biometric", "error"), 0);

        let broken = auth_with(simulated(PromptOutcome::Error, false));
        broken.submit_biometric().await.unwrap();
        assert_eq!(broken.metrics().auth_attempts("biometric", "error"), 1);
    }

    #[tokio::test]
    async fn test_biometric_unavailable_platform() {
        let auth = auth_with(Arc::new(UnavailablePlatform::new()));
        assert_eq!(auth.submit_biometric().await, Ok(false));
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_dropped_check_clears_loading() {
        let auth = auth_with(Arc::new(UnavailablePlatform::new()));
        {
            let guard = auth.begin_attempt("pin").unwrap();
            assert!(auth.snapshot().is_loading);
            assert_eq!(auth.submit_pin("123456").await, Err(AuthError::AttemptInFlight));
            drop(guard);
        }
        assert!(!auth.snapshot().is_loading);
        assert_eq!(auth.metrics().auth_attempts("pin", "rejected"), 1);
        assert_eq!(auth.submit_pin("123456").await, Ok(true));
    }
}
