// ── Controller abstraction ──
//
// Connection lifecycle for one X1: availability probe, registration,
// configuration fetch and registry build. `refresh` re-fetches the
// configuration only when its revision uid has moved.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};
use x1_api::models::CallbackRegistration;
use x1_api::{TlsMode, TransportConfig, X1Client};

use crate::config::{AuthCredentials, ControllerConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::ConfigurationSnapshot;
use crate::registry::Registry;
use crate::session::Session;
use crate::sync::SyncEngine;

// ── ConnectionState ──────────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Controller ───────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Devices handed out by
/// `registry()` stay valid across refreshes; they just stop being the
/// current ones once the configuration changes.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    session: Mutex<Option<Arc<Session>>>,
    registry: ArcSwapOption<Registry>,
    connection_state: watch::Sender<ConnectionState>,
}

impl Controller {
    /// Create a new Controller from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to authenticate and load devices.
    pub fn new(config: ControllerConfig) -> Self {
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            inner: Arc::new(ControllerInner {
                config,
                session: Mutex::new(None),
                registry: ArcSwapOption::empty(),
                connection_state,
            }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    // ── Connection lifecycle ─────────────────────────────────────────

    /// Connect to the controller.
    ///
    /// Probes availability, registers a client token (or adopts the
    /// configured one) and builds the device registry.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Connecting);

        match self.establish().await {
            Ok(()) => {
                let _ = self.inner.connection_state.send(ConnectionState::Connected);
                info!(url = %self.inner.config.url, "connected to controller");
                Ok(())
            }
            Err(e) => {
                let _ = self.inner.connection_state.send(ConnectionState::Failed);
                Err(e)
            }
        }
    }

    async fn establish(&self) -> Result<(), CoreError> {
        // Reconnecting replaces the session; its token must not leak.
        self.release_session().await;

        let config = &self.inner.config;
        let client = Arc::new(X1Client::new(config.url.clone(), &build_transport(config))?);

        if !client.check_availability().await {
            return Err(CoreError::Unavailable {
                url: config.url.to_string(),
            });
        }

        let session = match &config.auth {
            AuthCredentials::Credentials { username, password } => {
                Session::register(client, username, password, &config.client_id).await?
            }
            AuthCredentials::Token(token) => {
                debug!("using supplied token -- skipping registration");
                Session::with_token(client, token.clone())
            }
        };
        let session = Arc::new(session);
        *self.inner.session.lock().await = Some(Arc::clone(&session));

        if let Err(e) = self.load(&session).await {
            self.release_session().await;
            return Err(e);
        }
        Ok(())
    }

    /// Drop the current session and registry, deregistering the token if
    /// this controller registered it.
    async fn release_session(&self) {
        if let Some(session) = self.inner.session.lock().await.take() {
            if let Err(e) = session.close().await {
                warn!(error = %e, "deregistration failed (non-fatal)");
            }
        }
        self.inner.registry.store(None);
    }

    /// Re-check the configuration revision and rebuild the registry if it
    /// changed. Returns whether it did.
    pub async fn refresh(&self) -> Result<bool, CoreError> {
        let session = self.session().await?;
        let current = session.client().config_uid(session.token()).await?;

        if let Some(registry) = self.inner.registry.load_full() {
            if !registry.snapshot().is_stale(&current) {
                debug!(config = %current, "configuration unchanged");
                return Ok(false);
            }
            info!(
                from = %registry.config_uid(),
                to = %current,
                "configuration changed"
            );
        }

        self.load(&session).await?;
        Ok(true)
    }

    /// Fetch the configuration document and swap in a fresh registry.
    async fn load(&self, session: &Arc<Session>) -> Result<(), CoreError> {
        let config = &self.inner.config;
        let document = match session.client().ui_config(session.token(), &config.expand).await {
            Ok(document) => document,
            Err(x1_api::Error::Deserialization { message, .. }) => {
                return Err(CoreError::malformed(format!(
                    "unexpected document shape: {message}"
                )));
            }
            Err(e) => return Err(e.into()),
        };
        let snapshot = Arc::new(ConfigurationSnapshot::try_from(document)?);

        let engine = SyncEngine::new(Arc::clone(session), config.write_mode);
        let registry = Registry::build(snapshot, &engine);
        info!(
            config = %registry.config_uid(),
            devices = registry.len(),
            skipped = registry.skipped().len(),
            "device registry loaded"
        );
        self.inner.registry.store(Some(Arc::new(registry)));
        Ok(())
    }

    /// Disconnect from the controller.
    ///
    /// Deregisters the token if this controller registered it, then drops
    /// the session and the registry.
    pub async fn disconnect(&self) {
        self.release_session().await;
        let _ = self
            .inner
            .connection_state
            .send(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    /// One-shot: connect, run closure, disconnect.
    pub async fn oneshot<F, Fut, T>(config: ControllerConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let controller = Controller::new(config);
        controller.connect().await?;
        let result = f(controller.clone()).await;
        controller.disconnect().await;
        result
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The current device registry.
    pub fn registry(&self) -> Result<Arc<Registry>, CoreError> {
        self.inner
            .registry
            .load_full()
            .ok_or(CoreError::ControllerDisconnected)
    }

    pub async fn session(&self) -> Result<Arc<Session>, CoreError> {
        self.inner
            .session
            .lock()
            .await
            .clone()
            .ok_or(CoreError::ControllerDisconnected)
    }

    /// Ask the controller to call back on value or service events.
    pub async fn register_callbacks(
        &self,
        callbacks: &CallbackRegistration,
    ) -> Result<(), CoreError> {
        let session = self.session().await?;
        session
            .client()
            .register_callbacks(session.token(), callbacks)
            .await?;
        Ok(())
    }

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }
}

fn build_transport(config: &ControllerConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
