// ── Session ──
//
// An authenticated handle on one controller: the HTTP client plus the
// token every request carries. Sessions are plain values handed to the
// sync engine; any number of them can coexist.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, info};
use x1_api::X1Client;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenOrigin {
    /// Obtained through `register`; `close` deregisters it.
    Registered,
    /// Supplied by the caller; never deregistered by us.
    Supplied,
}

#[derive(Debug)]
pub struct Session {
    client: Arc<X1Client>,
    token: SecretString,
    origin: TokenOrigin,
}

impl Session {
    /// Register `client_id` for `username` and open a session on the new token.
    pub async fn register(
        client: Arc<X1Client>,
        username: &str,
        password: &SecretString,
        client_id: &str,
    ) -> Result<Self, CoreError> {
        let token = client.register_client(username, password, client_id).await?;
        info!(client_id, "registered with controller");
        Ok(Self {
            client,
            token,
            origin: TokenOrigin::Registered,
        })
    }

    /// Open a session on an existing, possibly revoked, token.
    ///
    /// A revoked token surfaces as `CoreError::Unauthorized` on first use.
    pub fn with_token(client: Arc<X1Client>, token: SecretString) -> Self {
        Self {
            client,
            token,
            origin: TokenOrigin::Supplied,
        }
    }

    pub fn client(&self) -> &X1Client {
        &self.client
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// Whether this session registered its own token.
    pub fn is_registered(&self) -> bool {
        self.origin == TokenOrigin::Registered
    }

    /// Deregister the token if this session registered it.
    pub async fn close(&self) -> Result<(), CoreError> {
        if self.is_registered() {
            self.client.unregister_client(&self.token).await?;
            debug!("session token deregistered");
        }
        Ok(())
    }
}
