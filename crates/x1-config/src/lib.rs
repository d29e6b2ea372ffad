//! Shared configuration for Gira X1 tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `x1_core::ControllerConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use x1_core::config::DEFAULT_CLIENT_ID;
use x1_core::{AuthCredentials, ControllerConfig, Expand, TlsVerification, WriteMode};

const KEYRING_SERVICE: &str = "x1";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("unknown profile '{name}'")]
    UnknownProfile { name: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = name.or(self.default_profile.as_deref()).unwrap_or("default");
        self.profiles
            .get(name)
            .map(|p| (name, p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }

    /// Resolve `name` (or the default profile) into a `ControllerConfig`.
    pub fn controller_config(&self, name: Option<&str>) -> Result<ControllerConfig, ConfigError> {
        let (name, profile) = self.profile(name)?;
        profile_to_controller_config(profile, name, &self.defaults)
    }
}

/// Settings every profile inherits unless it overrides them.
#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: Option<bool>,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// "individual" or "bulk".
    #[serde(default = "default_write_mode")]
    pub write_mode: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: None,
            timeout: default_timeout(),
            client_id: default_client_id(),
            write_mode: default_write_mode(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_client_id() -> String {
    DEFAULT_CLIENT_ID.into()
}
fn default_write_mode() -> String {
    "individual".into()
}

/// A named controller profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Controller base URL (e.g., "https://192.168.0.10").
    pub controller: String,

    /// Auth mode: "credentials" or "token".
    #[serde(default = "default_auth_mode")]
    pub auth_mode: String,

    pub username: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Previously registered token (plaintext -- prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the token.
    pub token_env: Option<String>,

    /// Override the client identifier.
    pub client_id: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// `true` skips verification, `false` uses the system store.
    pub insecure: Option<bool>,

    pub timeout: Option<u64>,

    pub write_mode: Option<String>,

    /// uiconfig sections to request; all of them when unset.
    pub expand: Option<Vec<String>>,
}

fn default_auth_mode() -> String {
    "credentials".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("de", "x1rs", "x1").map_or_else(
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
    p.push("x1");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load defaults, then `path` if it exists, then `X1_`-prefixed environment
/// variables (`X1_DEFAULTS__TIMEOUT=10`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("X1_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Credential resolution ───────────────────────────────────────────

/// Look up a secret: named env var, then keyring, then plaintext.
fn resolve_secret(
    env_name: Option<&str>,
    keyring_key: &str,
    plaintext: Option<&String>,
) -> Option<SecretString> {
    if let Some(val) = env_name.and_then(|name| std::env::var(name).ok()) {
        return Some(SecretString::from(val));
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, keyring_key) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    plaintext.map(|s| SecretString::from(s.clone()))
}

/// Resolve username + password for token registration.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let no_credentials = || ConfigError::NoCredentials {
        profile: profile_name.into(),
    };

    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("X1_USERNAME").ok())
        .ok_or_else(no_credentials)?;

    let password = resolve_secret(
        Some(profile.password_env.as_deref().unwrap_or("X1_PASSWORD")),
        &format!("{profile_name}/password"),
        profile.password.as_ref(),
    )
    .ok_or_else(no_credentials)?;

    Ok((username, password))
}

/// Resolve a previously registered token.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_secret(
        Some(profile.token_env.as_deref().unwrap_or("X1_TOKEN")),
        &format!("{profile_name}/token"),
        profile.token.as_ref(),
    )
    .ok_or_else(|| ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve `AuthCredentials` from a profile's `auth_mode` field.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<AuthCredentials, ConfigError> {
    match profile.auth_mode.as_str() {
        "credentials" => {
            let (username, password) = resolve_credentials(profile, profile_name)?;
            Ok(AuthCredentials::Credentials { username, password })
        }
        "token" => resolve_token(profile, profile_name).map(AuthCredentials::Token),
        other => Err(ConfigError::Validation {
            field: "auth_mode".into(),
            reason: format!("expected 'credentials' or 'token', got '{other}'"),
        }),
    }
}

fn parse_write_mode(raw: &str) -> Result<WriteMode, ConfigError> {
    match raw {
        "individual" => Ok(WriteMode::Individual),
        "bulk" => Ok(WriteMode::Bulk),
        other => Err(ConfigError::Validation {
            field: "write_mode".into(),
            reason: format!("expected 'individual' or 'bulk', got '{other}'"),
        }),
    }
}

fn parse_expand(raw: &[String]) -> Result<Vec<Expand>, ConfigError> {
    raw.iter()
        .map(|name| {
            Expand::ALL
                .into_iter()
                .find(|e| e.as_str() == name)
                .ok_or_else(|| ConfigError::Validation {
                    field: "expand".into(),
                    reason: format!("unknown section '{name}'"),
                })
        })
        .collect()
}

/// Build a `ControllerConfig` from a profile, falling back to `defaults`.
pub fn profile_to_controller_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ControllerConfig, ConfigError> {
    let url: url::Url = profile
        .controller
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "controller".into(),
            reason: format!("invalid URL: {}", profile.controller),
        })?;

    let auth = resolve_auth(profile, profile_name)?;

    let tls = if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else if profile.insecure.or(defaults.insecure) == Some(false) {
        TlsVerification::SystemDefaults
    } else {
        TlsVerification::DangerAcceptInvalid
    };

    let mut config = ControllerConfig::new(url, auth);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.client_id = profile
        .client_id
        .clone()
        .unwrap_or_else(|| defaults.client_id.clone());
    config.write_mode =
        parse_write_mode(profile.write_mode.as_deref().unwrap_or(&defaults.write_mode))?;
    if let Some(ref expand) = profile.expand {
        config.expand = parse_expand(expand)?;
    }
    Ok(config)
}
