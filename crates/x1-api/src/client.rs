// X1 REST API HTTP client
//
// Wraps `reqwest::Client` with X1-specific URL construction, token query
// handling and status mapping. Endpoint groups (auth, uiconfig, values) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ApiErrorEnvelope;
use crate::transport::TransportConfig;

/// Raw HTTP client for the X1 IoT REST API.
///
/// Stateless with respect to authentication: every authenticated call takes
/// the token explicitly, so several sessions can share one client.
#[derive(Debug, Clone)]
pub struct X1Client {
    http: reqwest::Client,
    base_url: Url,
}

impl X1Client {
    /// Create a new client from a `TransportConfig`.
    ///
    /// The `base_url` is the controller root, e.g. `https://192.168.0.10`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    /// Build `{base}/api/{path}?token={token}`.
    pub(crate) fn token_url(&self, path: &str, token: &SecretString) -> Result<Url, Error> {
        let mut url = self.api_url(path)?;
        url.query_pairs_mut()
            .append_pair("token", token.expose_secret());
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────
    //
    // URLs carry the token in their query string, so only the path is logged.

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!(path = url.path(), "GET");

        let resp = self.http.get(url).send().await?;
        let body = Self::success_body(resp).await?;
        decode_json(&body)
    }

    /// Send a PUT request with a JSON body, returning the raw response body.
    ///
    /// Write endpoints answer with an empty body on success.
    pub(crate) async fn put_json(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<String, Error> {
        debug!(path = url.path(), "PUT");

        let resp = self.http.put(url).json(body).send().await?;
        Self::success_body(resp).await
    }

    /// Send a POST request with a JSON body, returning the raw response body.
    pub(crate) async fn post_json(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<String, Error> {
        debug!(path = url.path(), "POST");

        let resp = self.http.post(url).json(body).send().await?;
        Self::success_body(resp).await
    }

    /// Send a DELETE request.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!(path = url.path(), "DELETE");

        let resp = self.http.delete(url).send().await?;
        Self::success_body(resp).await.map(|_| ())
    }

    /// Map the response status, returning the body text on success.
    ///
    /// 401/403 become `Unauthorized`, 423 becomes `Locked`, anything else
    /// outside 2xx becomes `Api` with the controller's error message.
    pub(crate) async fn success_body(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        trace!(status = status.as_u16(), "response");

        if status.is_success() {
            return Ok(resp.text().await?);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = error_message(&body);

        Err(match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Error::Unauthorized {
                    status: status.as_u16(),
                    message,
                }
            }
            reqwest::StatusCode::LOCKED => Error::Locked,
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        })
    }
}

/// Decode a JSON body, keeping the body around for debugging on failure.
pub(crate) fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

/// Pull the message out of `{"error": {...}}`, falling back to the body text.
fn error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
        if let Some(err) = envelope.error {
            return err.to_string();
        }
    }
    body.chars().take(200).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> X1Client {
        X1Client::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn api_url_joins_without_double_slash() {
        let c = client("https://192.168.0.10/");
        assert_eq!(
            c.api_url("v2/uiconfig/uid").unwrap().as_str(),
            "https://192.168.0.10/api/v2/uiconfig/uid"
        );
    }

    #[test]
    fn token_url_appends_query() {
        let c = client("https://192.168.0.10");
        let token = SecretString::from("ab&c".to_string());
        let url = c.token_url("values/a02n", &token).unwrap();
        assert_eq!(url.path(), "/api/values/a02n");
        assert_eq!(url.query(), Some("token=ab%26c"));
    }

    #[test]
    fn error_message_prefers_envelope() {
        let body = r#"{"error":{"code":"invalidToken","message":"Token is invalid"}}"#;
        assert_eq!(error_message(body), "invalidToken: Token is invalid");
        assert_eq!(error_message("plain failure"), "plain failure");
    }
}
