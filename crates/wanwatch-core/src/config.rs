// ── Runtime configuration ──
//
// These types describe *what* to watch and *where* to send it. They carry
// credential data and tuning, but never touch disk or the environment.
// The binary builds them through `wanwatch-config` and hands them in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use wanwatch_api::ControllerPlatform;

use crate::retry::RetryPolicy;
use crate::tracker::WAN_TRANSITION_KEY;

/// TLS verification strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Skip verification (self-signed controller certificates).
    DangerAcceptInvalid,
}

/// How to reach and log into the UniFi controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller URL (e.g., `https://192.168.1.1`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    /// Site whose alarm log is polled.
    pub site: String,
    pub platform: ControllerPlatform,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Where notifications are published.
#[derive(Debug, Clone)]
pub struct NtfyConfig {
    pub url: Url,
    pub topic: String,
    /// Basic auth, only when both user and password are configured.
    pub credentials: Option<(String, SecretString)>,
    pub timeout: Duration,
}

/// What to watch and how often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub poll_interval: Duration,
    /// Name of the primary WAN interface, e.g. `eth8`.
    pub iface: String,
    /// Alarm key marking a WAN transition.
    pub event_key: String,
    pub retry: RetryPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            iface: "eth8".into(),
            event_key: WAN_TRANSITION_KEY.into(),
            retry: RetryPolicy::default(),
        }
    }
}
