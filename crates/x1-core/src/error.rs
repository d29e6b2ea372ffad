// ── Core error types ──
//
// User-facing errors from x1-core. Local failures (codec, capability,
// binding) are detected before any request is sent; transport failures
// come through `From<x1_api::Error>` and are never retried here.

use thiserror::Error;

/// Value conversion failure between wire text and a typed value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// The wire text is not a valid encoding for the kind.
    #[error("cannot decode {raw:?} as {kind}")]
    Decode { kind: &'static str, raw: String },

    /// The value is well-formed but outside the kind's declared range.
    #[error("{value} is outside the allowed range {min}..={max}")]
    Range { value: f64, min: f64, max: f64 },

    /// The numeric value is not a member of the enumeration.
    #[error("{raw:?} is not a known {kind} value")]
    UnknownEnumValue { kind: &'static str, raw: String },

    /// The typed value does not belong to the target kind.
    #[error("expected a {expected} value, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration document ───────────────────────────────────────
    #[error("Malformed configuration: {message}")]
    MalformedConfig { message: String },

    #[error("Function {function} lacks required data point {point}")]
    MissingRequiredDataPoint { function: String, point: String },

    // ── Local operation errors ───────────────────────────────────────
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Operation not supported: {operation} on {function}")]
    UnsupportedOperation { function: String, operation: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Device not found: {identifier}")]
    NotFound { identifier: String },

    // ── Controller errors ────────────────────────────────────────────
    #[error("Controller at {url} is not available")]
    Unavailable { url: String },

    /// The controller accepted the request but refused this one write.
    #[error("Write to {uid} rejected: {message}")]
    WriteRejected { uid: String, message: String },

    /// Token or credentials rejected (HTTP 401/403). Re-authenticate.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Any other transport-layer failure, passed through untouched.
    #[error(transparent)]
    Transport(x1_api::Error),

    #[error("Controller disconnected")]
    ControllerDisconnected,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn unsupported(function: &str, operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            function: function.to_owned(),
            operation: operation.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedConfig {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<x1_api::Error> for CoreError {
    fn from(err: x1_api::Error) -> Self {
        match err {
            x1_api::Error::Unauthorized { status, message } => CoreError::Unauthorized {
                message: format!("HTTP {status}: {message}"),
            },
            other => CoreError::Transport(other),
        }
    }
}
