//! Shared configuration for the parkwatch CLI and TUI.
//!
//! TOML profiles (one per parking lot dashboard), environment overrides,
//! and translation to `parkwatch_core::PollerConfig`. Both binaries
//! depend on this crate; the CLI layers its flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use parkwatch_core::{PollerConfig, StalePolicy};

/// Prefix for environment overrides. Nested keys use `__`, e.g.
/// `PARKWATCH_DEFAULTS__POLL_INTERVAL_MS=500`.
pub const ENV_PREFIX: &str = "PARKWATCH_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named dashboards, each pointing at one status server.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when no explicit one is given.
    pub fn default_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Per-request timeout. Unset means requests may hang indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            output: default_output(),
            color: default_color(),
            timeout_ms: None,
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// A named parking lot dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Status server root (e.g., "http://127.0.0.1:5000").
    pub server: String,

    /// Human-readable lot name shown in headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Override `defaults.poll_interval_ms`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,

    /// Override `defaults.timeout_ms`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Drop responses that complete after a newer one was shown.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub discard_stale: bool,
}

impl Profile {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            name: None,
            poll_interval_ms: None,
            timeout_ms: None,
            discard_stale: false,
        }
    }

    /// Display label: the configured lot name, else the profile key.
    pub fn label<'a>(&'a self, profile_name: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(profile_name)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "parkwatch", "parkwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("parkwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file + environment. A missing file yields
/// the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse and check a status server URL.
pub fn parse_server(server: &str) -> Result<url::Url, ConfigError> {
    server.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {server}"),
    })
}

/// Build a `PollerConfig` from a profile, falling back to `defaults`
/// for anything the profile leaves unset. No CLI flag overrides.
pub fn profile_to_poller_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<PollerConfig, ConfigError> {
    let url = parse_server(&profile.server)?;

    let interval_ms = profile.poll_interval_ms.unwrap_or(defaults.poll_interval_ms);
    let mut config = PollerConfig::new(url).with_poll_interval(Duration::from_millis(interval_ms));

    if let Some(ms) = profile.timeout_ms.or(defaults.timeout_ms) {
        config = config.with_request_timeout(Duration::from_millis(ms));
    }
    if profile.discard_stale {
        config = config.with_stale_policy(StalePolicy::DiscardStale);
    }

    config.validate().map_err(|e| ConfigError::Validation {
        field: "profile".into(),
        reason: e.to_string(),
    })?;
    Ok(config)
}
