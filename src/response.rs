//! Gateway response envelope.
//!
//! The router returns a structured [`GatewayResponse`]; the hosting layer
//! serializes it to the wire shape it needs. String bodies are wrapped in a
//! `{"message": ...}` JSON object, and every response carries the CORS
//! header set with `Access-Control-Allow-Origin` resolved from the inbound
//! event's origin, passed in explicitly.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

use crate::error::Result;

/// Well-known status codes used by the router.
pub mod status {
    /// Success with a body.
    pub const OK: u16 = 200;
    /// Success without a body.
    pub const NO_CONTENT: u16 = 204;
    /// Client sent something we could not parse.
    pub const BAD_REQUEST: u16 = 400;
    /// Processing failed.
    pub const INTERNAL_ERROR: u16 = 500;
}

/// Structured response returned by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    /// HTTP-style status code.
    pub status_code: u16,
    /// Response headers (CORS set plus content type).
    pub headers: BTreeMap<String, String>,
    /// JSON body as a string; empty for 204.
    pub body: String,
}

impl GatewayResponse {
    /// Build a response with an explicit status and JSON body value.
    ///
    /// A 204 always carries an empty body, whatever value was passed.
    pub fn with_status(
        status_code: u16,
        body: serde_json::Value,
        origin: Option<&str>,
    ) -> Result<Self> {
        let body = if status_code == status::NO_CONTENT {
            String::new()
        } else {
            serde_json::to_string(&body)?
        };

        Ok(Self {
            status_code,
            headers: cors_headers(origin),
            body,
        })
    }

    /// 200 response wrapping a message string.
    pub fn ok(message: &str, origin: Option<&str>) -> Result<Self> {
        Self::with_status(status::OK, json!({ "message": message }), origin)
    }

    /// 204 response with an empty body.
    pub fn no_content(origin: Option<&str>) -> Self {
        Self {
            status_code: status::NO_CONTENT,
            headers: cors_headers(origin),
            body: String::new(),
        }
    }

    /// 400 response wrapping an error message.
    pub fn bad_request(message: &str, origin: Option<&str>) -> Result<Self> {
        Self::with_status(status::BAD_REQUEST, json!({ "message": message }), origin)
    }

    /// 500 response wrapping an error message.
    pub fn error(message: &str, origin: Option<&str>) -> Result<Self> {
        Self::with_status(
            status::INTERNAL_ERROR,
            json!({ "message": message }),
            origin,
        )
    }

    /// Check if this response signals success (2xx).
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Assemble the CORS header set.
///
/// `Access-Control-Allow-Origin` echoes the request origin when known,
/// falling back to `*`.
pub fn cors_headers(origin: Option<&str>) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(
        "Access-Control-Allow-Origin".to_string(),
        origin.unwrap_or("*").to_string(),
    );
    headers.insert(
        "Access-Control-Allow-Credentials".to_string(),
        "true".to_string(),
    );
    headers.insert(
        "Access-Control-Allow-Method".to_string(),
        "GET, POST, PATCH, PUT, DELETE, OPTIONS".to_string(),
    );
    headers.insert(
        "Access-Control-Allow-Headers".to_string(),
        "X-Prefix, Origin, Content-Type, Content-Encoding".to_string(),
    );
    headers.insert(
        "Access-Control-Expose-Headers".to_string(),
        "X-Result, X-Error".to_string(),
    );
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers
}
