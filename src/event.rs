//! Inbound connection events.
//!
//! One [`ConnectionEvent`] is delivered per invocation by the hosting
//! transport layer. Its lifecycle is owned by the caller; this crate only
//! reads it, and always via explicit parameters (never shared state).

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;
use serde::Deserialize;

use crate::error::{Result, SockgateError};

/// Lifecycle event tag carried by the invocation.
///
/// Anything other than `CONNECT`/`DISCONNECT` is treated as a message
/// event, matching the gateway's default-route behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EventType {
    /// New connection established.
    #[serde(rename = "CONNECT")]
    Connect,
    /// Connection torn down.
    #[serde(rename = "DISCONNECT")]
    Disconnect,
    /// Inbound message (default route).
    #[serde(other)]
    Message,
}

/// Request context delivered alongside the event body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    /// Lifecycle event tag.
    pub event_type: EventType,
    /// Gateway-assigned connection identifier, when present.
    #[serde(default)]
    pub connection_id: Option<String>,
}

/// One inbound invocation event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEvent {
    /// Request context with the event-type discriminant.
    pub request_context: EventContext,
    /// HTTP headers from the upgrade request, when present.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Base64-encoded bytes of one frame, for message events.
    #[serde(default)]
    pub body: Option<String>,
}

impl ConnectionEvent {
    /// Create an event without body or headers (connect/disconnect).
    pub fn new(event_type: EventType) -> Self {
        Self {
            request_context: EventContext {
                event_type,
                connection_id: None,
            },
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create a message event carrying raw frame bytes (base64-encodes them).
    pub fn message(frame: &[u8]) -> Self {
        Self {
            request_context: EventContext {
                event_type: EventType::Message,
                connection_id: None,
            },
            headers: HashMap::new(),
            body: Some(BASE64.encode(frame)),
        }
    }

    /// Get the lifecycle event tag.
    #[inline]
    pub fn event_type(&self) -> EventType {
        self.request_context.event_type
    }

    /// Get the `origin` header of the upgrade request, if any.
    pub fn origin(&self) -> Option<&str> {
        self.headers.get("origin").map(String::as_str)
    }

    /// Decode the base64 body into raw frame bytes.
    ///
    /// # Errors
    ///
    /// [`SockgateError::MissingBody`] if the event has no body,
    /// [`SockgateError::Base64`] if the body is not valid base64.
    pub fn raw_body(&self) -> Result<Bytes> {
        let body = self.body.as_deref().ok_or(SockgateError::MissingBody)?;
        let bytes = BASE64.decode(body)?;
        Ok(Bytes::from(bytes))
    }
}
