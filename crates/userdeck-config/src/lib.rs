//! Backend endpoint configuration for the userdeck console.
//!
//! The backend address is assembled from protocol/host/port, resolved once
//! at startup from a TOML file plus `USERDECK_*` environment variables with
//! fixed fallback defaults, then injected into the API client. Nothing
//! reads the environment after startup.

use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

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

// ── Config struct ───────────────────────────────────────────────────

/// Where the backend lives. The only runtime configuration surface.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// URL scheme, `http` unless the backend sits behind TLS.
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Backend hostname or address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Backend port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_protocol() -> String {
    "http".into()
}
fn default_host() -> String {
    "localhost".into()
}
fn default_port() -> u16 {
    8000
}

impl Config {
    /// Assemble the backend base URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = format!("{}://{}:{}", self.protocol, self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Validation {
            field: "backend".into(),
            reason: format!("invalid URL: {raw}"),
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "userdeck", "userdeck").map_or_else(
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
    p.push("userdeck");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the config from defaults + file + `USERDECK_*` environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("USERDECK_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the config, falling back to defaults on any failure.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize the config to TOML at the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_point_at_local_backend() {
        let cfg = Config::default();
        assert_eq!(cfg.base_url().unwrap().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn env_vars_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("USERDECK_HOST", "backend.internal");
            jail.set_env("USERDECK_PORT", "9001");
            let cfg = load_config().expect("config should load");
            assert_eq!(cfg.protocol, "http");
            assert_eq!(cfg.host, "backend.internal");
            assert_eq!(cfg.port, 9001);
            Ok(())
        });
    }

    #[test]
    fn bogus_host_is_a_validation_error() {
        let cfg = Config {
            host: "not a host".into(),
            ..Config::default()
        };
        assert!(matches!(
            cfg.base_url(),
            Err(ConfigError::Validation { .. })
        ));
    }
}
