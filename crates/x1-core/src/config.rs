// ── Runtime connection configuration ──
//
// These types describe *how* to connect to an X1 controller. They carry
// credential data and connection tuning, but never touch disk.
// Callers (or `x1-config`) construct a `ControllerConfig` and hand it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;
use x1_api::Expand;

use crate::sync::WriteMode;

/// Client identifier registered with the controller when none is configured.
pub const DEFAULT_CLIENT_ID: &str = "de.x1rs.client";

/// How to authenticate with a controller.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// Register a new client token with the controller's user credentials.
    /// The token is deregistered again on disconnect.
    Credentials {
        username: String,
        password: SecretString,
    },
    /// An already registered token. Never deregistered by us.
    Token(SecretString),
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. The X1 ships a self-signed certificate.
    #[default]
    DangerAcceptInvalid,
}

impl PartialEq for TlsVerification {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::SystemDefaults, Self::SystemDefaults)
            | (Self::DangerAcceptInvalid, Self::DangerAcceptInvalid) => true,
            (Self::CustomCa(a), Self::CustomCa(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TlsVerification {}

/// Configuration for connecting to a single controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller URL (e.g., `https://192.168.0.10`).
    pub url: Url,
    pub auth: AuthCredentials,
    /// Identifier the token is registered under.
    pub client_id: String,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Optional uiconfig sections to request.
    pub expand: Vec<Expand>,
    /// How multi-value pushes reach the controller.
    pub write_mode: WriteMode,
}

impl ControllerConfig {
    /// Defaults for everything but the address and credentials.
    pub fn new(url: Url, auth: AuthCredentials) -> Self {
        Self {
            url,
            auth,
            client_id: DEFAULT_CLIENT_ID.to_owned(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            expand: Expand::ALL.to_vec(),
            write_mode: WriteMode::default(),
        }
    }
}
