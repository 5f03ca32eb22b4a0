#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use figment::providers::{Format, Yaml};
use figment::Figment;
use tokio::sync::{Notify, Semaphore};
use tubank_auth::auth::LocalAuth;
use tubank_auth::config::{extract_config, ConfigV1};
use tubank_auth::delay::{Delay, NoDelay};
use tubank_auth::models::{BiometricType, HardwareCapability, PromptOptions, PromptResult};
use tubank_auth::platform::{BiometricPlatform, PlatformError};

pub const TEST_CONFIG: &str = r#"
version: "1.0.0"
logging:
  level: "debug"
  format: "json"
pin:
  reference: "123456"
  verify_delay_ms: 1000
biometric:
  prompt_message: "Autentícate para acceder a TUBANK"
  cancel_label: "Cancelar"
  fallback_label: "Usar PIN"
platform:
  type: "simulated"
  name: "test-phone"
  has_hardware: true
  supported_types: ["fingerprint", "facial-recognition"]
  prompt_outcome: "success"
"#;

pub fn load_test_config(yaml: &str) -> ConfigV1 {
    extract_config(&Figment::new().merge(Yaml::string(yaml))).expect("test config should load")
}

/// A door that a fake call walks up to and waits at until the test opens it.
pub struct Gate {
    entered: Notify,
    release: Semaphore,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            release: Semaphore::new(0),
        })
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release
            .acquire()
            .await
            .expect("gate semaphore closed")
            .forget();
    }

    /// Resolves once a call is parked at the gate.
    pub async fn wait_until_entered(&self) {
        self.entered.notified().await;
    }

    pub fn open(&self) {
        self.release.add_permits(1);
    }
}

/// A delay that parks at a gate instead of sleeping.
pub struct GatedDelay {
    pub gate: Arc<Gate>,
}

#[async_trait]
impl Delay for GatedDelay {
    async fn wait(&self, _duration: Duration) {
        self.gate.pass().await;
    }
}

/// A scripted platform. When `gate` is set both calls park there first.
pub struct FakePlatform {
    pub probe_result: Result<HardwareCapability, PlatformError>,
    pub prompt_result: Result<PromptResult, PlatformError>,
    pub gate: Option<Arc<Gate>>,
}

impl FakePlatform {
    pub fn with_fingerprint(prompt_result: Result<PromptResult, PlatformError>) -> Self {
        Self {
            probe_result: Ok(HardwareCapability {
                has_hardware: true,
                supported_types: vec![BiometricType::Fingerprint],
            }),
            prompt_result,
            gate: None,
        }
    }

    pub fn gated(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl BiometricPlatform for FakePlatform {
    fn get_name(&self) -> &str {
        "fake"
    }

    async fn probe(&self) -> Result<HardwareCapability, PlatformError> {
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        self.probe_result.clone()
    }

    async fn prompt(&self, _options: &PromptOptions) -> Result<PromptResult, PlatformError> {
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        self.prompt_result.clone()
    }
}

pub fn build_auth(platform: Arc<dyn BiometricPlatform>, delay: Arc<dyn Delay>) -> LocalAuth {
    let config = load_test_config(TEST_CONFIG);
    LocalAuth::new(platform, delay, &config.pin, config.biometric.clone())
}

pub fn instant_auth(platform: Arc<dyn BiometricPlatform>) -> LocalAuth {
    build_auth(platform, Arc::new(NoDelay))
}
