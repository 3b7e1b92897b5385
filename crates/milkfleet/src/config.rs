//! CLI configuration: TOML file + `MILKFLEET_*` environment + flag overrides.
//!
//! Resolution order for every setting is flag > environment > config file >
//! built-in default. The result is translated into a `FleetConfig`, which is
//! all `milkfleet-core` ever sees -- core never reads files or the
//! environment itself.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use milkfleet_core::FleetConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── TOML config struct ──────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Backend base URL.
    pub url: Option<String>,

    /// Accept self-signed TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Device list poll cadence in seconds (`watch` only).
    #[serde(default = "default_device_poll")]
    pub device_poll_secs: u64,

    /// Transaction and account poll cadence in seconds (`watch` only).
    #[serde(default = "default_slow_poll")]
    pub slow_poll_secs: u64,
}

fn default_timeout() -> u64 {
    30
}
fn default_device_poll() -> u64 {
    3
}
fn default_slow_poll() -> u64 {
    10
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "milkfleet", "milkfleet").map_or_else(
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
    p.push("milkfleet");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full `Config` from file + environment.
pub fn load_config() -> Result<Config, CliError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config {
            timeout: default_timeout(),
            device_poll_secs: default_device_poll(),
            slow_poll_secs: default_slow_poll(),
            ..Config::default()
        }))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("MILKFLEET_"));

    Ok(figment.extract()?)
}

/// Load config, returning defaults if the file doesn't exist or is broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_else(|_| Config {
        timeout: default_timeout(),
        device_poll_secs: default_device_poll(),
        slow_poll_secs: default_slow_poll(),
        ..Config::default()
    })
}

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), CliError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: e.to_string(),
    })?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── FleetConfig resolution ──────────────────────────────────────────

/// Build a `FleetConfig` from the config file plus CLI flag overrides.
///
/// `polling` enables the background poll cadences; one-shot commands pass
/// `false` so no poll tasks are spawned.
pub fn resolve_fleet_config(global: &GlobalOpts, polling: bool) -> Result<FleetConfig, CliError> {
    let cfg = load_config_or_default();

    let url_str = global
        .url
        .clone()
        .or(cfg.url)
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
    let base_url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let (device_poll, slow_poll) = if polling {
        (
            Duration::from_secs(cfg.device_poll_secs),
            Duration::from_secs(cfg.slow_poll_secs),
        )
    } else {
        (Duration::ZERO, Duration::ZERO)
    };

    Ok(FleetConfig {
        base_url,
        timeout: Duration::from_secs(global.timeout),
        accept_invalid_certs: global.insecure || cfg.insecure,
        device_poll_interval: device_poll,
        transaction_poll_interval: slow_poll,
        account_poll_interval: slow_poll,
    })
}
