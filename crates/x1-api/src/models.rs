// X1 REST API payload types
//
// Raw shapes of the JSON documents exchanged with the controller. Fields use
// `Option` and `#[serde(default)]` liberally: the uiconfig document only
// carries capability flags, parameters, locations and trades when the
// matching `expand` option was requested. Structural validation happens in
// `x1-core`, not here.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ── Values ───────────────────────────────────────────────────────────

/// A data-point value as it appears on the wire.
///
/// The controller reports values as strings (`"1"`, `"21.5"`), but accepts
/// numbers and booleans in write requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl WireValue {
    /// The textual form of the value (`true` → `"1"`, numbers as written).
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Bool(true) => Cow::Borrowed("1"),
            Self::Bool(false) => Cow::Borrowed("0"),
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for WireValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for WireValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One `{uid, value}` pair, used by both the read and the write endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord {
    pub uid: String,
    pub value: WireValue,
}

impl ValueRecord {
    pub fn new(uid: impl Into<String>, value: impl Into<WireValue>) -> Self {
        Self {
            uid: uid.into(),
            value: value.into(),
        }
    }
}

/// `{ "values": [...] }` wrapper used by `GET api/values/{uid}` and the
/// multi-value write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValuesEnvelope {
    #[serde(default)]
    pub values: Vec<ValueRecord>,
}

/// Body of a single-value write: `{ "value": ... }`.
#[derive(Debug, Serialize)]
pub(crate) struct SingleValue<'a> {
    pub value: &'a WireValue,
}

/// Per-uid result reported by the multi-value write endpoint.
///
/// The controller normally answers with an empty body; when it does report
/// per-uid results, entries without an `error` were accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteStatus {
    pub uid: String,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct WriteStatusEnvelope {
    #[serde(default)]
    pub values: Vec<WriteStatus>,
}

// ── Errors ───────────────────────────────────────────────────────────

/// The controller wraps failures as `{"error": {"code": "...", "message": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(msg)) => write!(f, "{code}: {msg}"),
            (Some(code), None) => f.write_str(code),
            (None, Some(msg)) => f.write_str(msg),
            (None, None) => f.write_str("unspecified error"),
        }
    }
}

// ── Clients & callbacks ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct ClientRegistration<'a> {
    pub client: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub token: String,
}

/// Body of `POST api/v2/clients/{token}/callbacks`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackRegistration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_callback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_callback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_callbacks: Option<bool>,
}

// ── UI configuration ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct UidResponse {
    pub uid: String,
}

/// The full configuration document from `GET api/uiconfig`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub functions: Option<Vec<RawFunction>>,
    /// Present with `expand=locations`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub locations: Vec<RawLocation>,
    /// Present with `expand=trades`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub trades: Vec<RawTrade>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One configured function (logical device).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFunction {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub function_type: Option<String>,
    #[serde(default)]
    pub channel_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data_points: Vec<RawDataPoint>,
    /// Present with `expand=parameters`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parameters: Vec<RawParameter>,
}

/// One data point of a function. The capability flags are only present
/// with `expand=dataPointFlags`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDataPoint {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub can_read: Option<bool>,
    #[serde(default)]
    pub can_write: Option<bool>,
    #[serde(default)]
    pub can_event: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawParameter {
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub location_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub functions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub locations: Vec<RawLocation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrade {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub trade_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub functions: Vec<String>,
}

/// Sections the controller sometimes sends as an explicit `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
