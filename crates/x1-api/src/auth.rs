// Client registration and availability
//
// The X1 hands out long-lived tokens per (username, client identifier)
// pair. Registering the same pair again yields the same token; the token
// stays valid until the client is unregistered or the user is removed.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::{X1Client, decode_json};
use crate::error::Error;
use crate::models::{CallbackRegistration, ClientRegistration, TokenResponse};

impl X1Client {
    /// Probe `GET api/v2`. Returns `true` only for HTTP 200.
    ///
    /// Connection failures count as "not available" rather than errors.
    pub async fn check_availability(&self) -> bool {
        let url = match self.api_url("v2") {
            Ok(url) => url,
            Err(e) => {
                debug!(error = %e, "availability probe URL invalid");
                return false;
            }
        };

        debug!(path = url.path(), "probing availability");
        match self.http().get(url).send().await {
            Ok(resp) => resp.status() == reqwest::StatusCode::OK,
            Err(e) => {
                debug!(error = %e, "availability probe failed");
                false
            }
        }
    }

    /// Register this client and obtain a token.
    ///
    /// `POST api/v2/clients` with HTTP basic auth and `{"client": client_id}`.
    /// The client identifier should be a URN within the client's
    /// organization, e.g. `de.example.x1client`.
    pub async fn register_client(
        &self,
        username: &str,
        password: &SecretString,
        client_id: &str,
    ) -> Result<SecretString, Error> {
        let url = self.api_url("v2/clients")?;
        debug!(path = url.path(), client_id, "registering client");

        let resp = self
            .http()
            .post(url)
            .basic_auth(username, Some(password.expose_secret()))
            .json(&ClientRegistration { client: client_id })
            .send()
            .await?;

        let body = Self::success_body(resp).await?;
        let TokenResponse { token } = decode_json(&body)?;

        debug!("client registered");
        Ok(SecretString::from(token))
    }

    /// Unregister a client token.
    ///
    /// `DELETE api/v2/clients/{token}?token={token}`. The controller answers 204.
    pub async fn unregister_client(&self, token: &SecretString) -> Result<(), Error> {
        let path = format!("v2/clients/{}", token.expose_secret());
        let url = self.token_url(&path, token)?;
        self.delete(url).await?;
        debug!("client unregistered");
        Ok(())
    }

    /// Register callback URLs for service and value events.
    ///
    /// `POST api/v2/clients/{token}/callbacks`. Receiving the callbacks is
    /// the caller's business; only the controller's answer is checked.
    pub async fn register_callbacks(
        &self,
        token: &SecretString,
        callbacks: &CallbackRegistration,
    ) -> Result<(), Error> {
        let path = format!("v2/clients/{}/callbacks", token.expose_secret());
        let url = self.token_url(&path, token)?;
        let _ = self.post_json(url, callbacks).await?;
        Ok(())
    }
}
