//! Configuration for wanwatch.
//!
//! Layered loading (built-in defaults, optional TOML file, `UNTFY_*`
//! environment), validation, and translation into the runtime configs of
//! `wanwatch_core`. The core never reads files or the environment itself.

mod de;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment, Metadata, Profile, Provider,
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map, Uncased, UncasedStr, Value},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use wanwatch_api::ControllerPlatform;
use wanwatch_core::{
    ControllerConfig, MonitorConfig, NtfyConfig, RetryPolicy, TlsVerification, WAN_TRANSITION_KEY,
};

/// Prefix of every recognised environment variable.
pub const ENV_PREFIX: &str = "UNTFY_";

/// `UNTFY_CONTROLLER_TYPE` value selecting the UniFi OS path layout.
pub const UNIFI_OS_CONTROLLER_TYPE: &str = "UDM Pro";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Config structs ──────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Seconds to sleep before each poll.
    #[serde(default = "default_polling_interval", deserialize_with = "de::lenient_u64")]
    pub polling_interval: u64,

    /// Interface whose WAN transitions are reported.
    #[serde(default = "default_iface", deserialize_with = "de::lenient_string")]
    pub primary_iface: String,

    /// Alarm key of WAN transitions.
    #[serde(default = "default_event_key", deserialize_with = "de::lenient_string")]
    pub event_key: String,

    #[serde(default, deserialize_with = "de::flag")]
    pub debug_mode: bool,

    #[serde(default)]
    pub controller: ControllerSection,

    #[serde(default)]
    pub ntfy: NtfySection,

    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            polling_interval: default_polling_interval(),
            primary_iface: default_iface(),
            event_key: default_event_key(),
            debug_mode: false,
            controller: ControllerSection::default(),
            ntfy: NtfySection::default(),
            retry: RetryPolicy::default(),
        }
    }
}

fn default_polling_interval() -> u64 {
    10
}
fn default_iface() -> String {
    "eth8".into()
}
fn default_event_key() -> String {
    WAN_TRANSITION_KEY.into()
}
fn default_timeout() -> u64 {
    30
}

/// UniFi controller connection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerSection {
    #[serde(default = "default_controller_url", deserialize_with = "de::lenient_string")]
    pub url: String,

    #[serde(default, deserialize_with = "de::lenient_string")]
    pub user: String,

    /// Plaintext password -- prefer the `UNTFY_CONTROLLER_PW` variable.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub password: String,

    #[serde(default = "default_true", deserialize_with = "de::flag")]
    pub verify_tls: bool,

    /// `"UDM Pro"` for UniFi OS consoles, anything else for a standalone
    /// Network Application.
    #[serde(
        rename = "type",
        default = "default_controller_type",
        deserialize_with = "de::lenient_string"
    )]
    pub controller_type: String,

    #[serde(default = "default_site", deserialize_with = "de::lenient_string")]
    pub site: String,

    #[serde(default = "default_timeout", deserialize_with = "de::lenient_u64")]
    pub timeout: u64,
}

impl Default for ControllerSection {
    fn default() -> Self {
        Self {
            url: default_controller_url(),
            user: String::new(),
            password: String::new(),
            verify_tls: true,
            controller_type: default_controller_type(),
            site: default_site(),
            timeout: default_timeout(),
        }
    }
}

fn default_controller_url() -> String {
    "https://192.168.1.1".into()
}
fn default_true() -> bool {
    true
}
fn default_controller_type() -> String {
    UNIFI_OS_CONTROLLER_TYPE.into()
}
fn default_site() -> String {
    "default".into()
}

/// ntfy publishing target.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NtfySection {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub url: String,

    #[serde(default = "default_topic", deserialize_with = "de::lenient_string")]
    pub topic: String,

    #[serde(default, deserialize_with = "de::lenient_string")]
    pub user: String,

    #[serde(default, deserialize_with = "de::lenient_string")]
    pub password: String,

    #[serde(default = "default_timeout", deserialize_with = "de::lenient_u64")]
    pub timeout: u64,
}

impl Default for NtfySection {
    fn default() -> Self {
        Self {
            url: String::new(),
            topic: default_topic(),
            user: String::new(),
            password: String::new(),
            timeout: default_timeout(),
        }
    }
}

fn default_topic() -> String {
    "alerts".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the default config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "wanwatch", "wanwatch").map_or_else(
        || PathBuf::from("wanwatch.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Map `UNTFY_*` names (prefix stripped) onto config keys.
///
/// Keeps the historical spellings, including `POLLING_INTERVALL` and the
/// `_PW` suffix.
fn env_key(key: &UncasedStr) -> Uncased<'_> {
    let mapped = match key.as_str().to_ascii_lowercase().as_str() {
        "polling_intervall" | "polling_interval" => "polling_interval",
        "primary_iface" => "primary_iface",
        "event_key" => "event_key",
        "debug_mode" => "debug_mode",
        "controller_url" => "controller.url",
        "controller_user" => "controller.user",
        "controller_pw" | "controller_password" => "controller.password",
        "controller_verify_tls" => "controller.verify_tls",
        "controller_type" => "controller.type",
        "controller_site" => "controller.site",
        "controller_timeout" => "controller.timeout",
        "ntfy_url" => "ntfy.url",
        "ntfy_topic" => "ntfy.topic",
        "ntfy_user" => "ntfy.user",
        "ntfy_pw" | "ntfy_password" => "ntfy.password",
        "ntfy_timeout" => "ntfy.timeout",
        "retry_max" => "retry.max_retries",
        "retry_delay_secs" => "retry.delay_secs",
        _ => return Uncased::from_borrowed(key.as_str()),
    };
    Uncased::from_borrowed(mapped)
}

/// Keys whose environment values are parsed as numbers or booleans.
/// Every other value is taken verbatim, so `007123` stays a password and
/// `[secret]` stays a string.
const TYPED_KEYS: &[&str] = &[
    "polling_interval",
    "debug_mode",
    "controller.verify_tls",
    "controller.timeout",
    "ntfy.timeout",
    "retry.max_retries",
    "retry.delay_secs",
];

/// The `UNTFY_*` environment layer.
pub struct EnvLayer {
    env: Env,
}

impl EnvLayer {
    pub fn new() -> Self {
        Self {
            env: Env::prefixed(ENV_PREFIX).map(env_key),
        }
    }
}

impl Default for EnvLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for EnvLayer {
    fn metadata(&self) -> Metadata {
        Metadata::named(format!("`{ENV_PREFIX}*` environment variable(s)"))
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut layer = Figment::new();
        for (key, raw) in self.env.iter() {
            let key = key.as_str().to_ascii_lowercase();
            let value = if TYPED_KEYS.contains(&key.as_str()) {
                let Ok(parsed) = raw.parse::<Value>();
                parsed
            } else {
                Value::from(raw)
            };
            layer = layer.merge(Serialized::default(&key, value));
        }
        layer.data()
    }
}

/// The environment layer on its own.
pub fn env_provider() -> EnvLayer {
    EnvLayer::new()
}

/// Load the config from defaults, a TOML file, and the environment.
///
/// An explicitly given `path` must exist; the default path is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) if !path.exists() => {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        Some(path) => path.to_path_buf(),
        None => config_path(),
    };

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&file))
        .merge(env_provider());

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Effective config dump ───────────────────────────────────────────

const REDACTED: &str = "********";

/// Render the effective config as TOML with passwords masked.
pub fn to_toml_redacted(config: &Config) -> Result<String, ConfigError> {
    let mut shown = config.clone();
    for password in [&mut shown.controller.password, &mut shown.ntfy.password] {
        if !password.is_empty() {
            REDACTED.clone_into(password);
        }
    }
    Ok(toml::to_string_pretty(&shown)?)
}

// ── Translation to runtime configs ──────────────────────────────────

/// Only the exact UniFi OS marker selects the proxied layout.
pub fn platform_for(controller_type: &str) -> ControllerPlatform {
    if controller_type
        .trim()
        .eq_ignore_ascii_case(UNIFI_OS_CONTROLLER_TYPE)
    {
        ControllerPlatform::UnifiOs
    } else {
        ControllerPlatform::ClassicController
    }
}

fn parse_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    if value.trim().is_empty() {
        return Err(invalid(field, "must be set"));
    }
    value
        .trim()
        .parse()
        .map_err(|e| invalid(field, format!("invalid URL '{value}': {e}")))
}

impl Config {
    pub fn controller_config(&self) -> Result<ControllerConfig, ConfigError> {
        let section = &self.controller;
        let url = parse_url("controller.url", &section.url)?;
        if section.site.trim().is_empty() {
            return Err(invalid("controller.site", "must not be empty"));
        }

        Ok(ControllerConfig {
            url,
            username: section.user.clone(),
            password: SecretString::from(section.password.clone()),
            site: section.site.clone(),
            platform: platform_for(&section.controller_type),
            tls: if section.verify_tls {
                TlsVerification::SystemDefaults
            } else {
                TlsVerification::DangerAcceptInvalid
            },
            timeout: Duration::from_secs(section.timeout),
        })
    }

    pub fn ntfy_config(&self) -> Result<NtfyConfig, ConfigError> {
        let section = &self.ntfy;
        let url = parse_url("ntfy.url", &section.url)?;
        let topic = section.topic.trim().trim_matches('/');
        if topic.is_empty() {
            return Err(invalid("ntfy.topic", "must not be empty"));
        }

        let credentials = if section.user.is_empty() || section.password.is_empty() {
            None
        } else {
            Some((
                section.user.clone(),
                SecretString::from(section.password.clone()),
            ))
        };

        Ok(NtfyConfig {
            url,
            topic: topic.to_owned(),
            credentials,
            timeout: Duration::from_secs(section.timeout),
        })
    }

    pub fn monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
        if self.polling_interval == 0 {
            return Err(invalid("polling_interval", "must be at least 1 second"));
        }
        if self.primary_iface.trim().is_empty() {
            return Err(invalid("primary_iface", "must not be empty"));
        }

        Ok(MonitorConfig {
            poll_interval: Duration::from_secs(self.polling_interval),
            iface: self.primary_iface.trim().to_owned(),
            event_key: self.event_key.clone(),
            retry: self.retry,
        })
    }
}
