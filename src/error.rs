//! Error types for sockgate.

use thiserror::Error;

/// Main error type for all sockgate operations.
#[derive(Debug, Error)]
pub enum SockgateError {
    /// JSON serialization/deserialization error (events, responses, records).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decode error on an inbound message body.
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Payload is not valid UTF-8 text.
    #[error("invalid UTF-8 payload: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Frame buffer is structurally invalid (truncated, bad field).
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// Frame requires 64-bit extended payload length, which is out of scope.
    #[error("unsupported frame: 64-bit extended payload length")]
    UnsupportedFrame,

    /// Message event arrived without a body.
    #[error("message event has no body")]
    MissingBody,

    /// Configuration error (missing or invalid environment variable).
    #[error("configuration error: {0}")]
    Config(String),

    /// Downstream publish failed (queue closed, broker rejected, etc.).
    #[error("publish error: {0}")]
    Publish(String),
}

/// Result type alias using SockgateError.
pub type Result<T> = std::result::Result<T, SockgateError>;
