//! Connection lifecycle router.
//!
//! A stateless, per-event dispatcher: `CONNECT` and `DISCONNECT` are
//! acknowledged directly, everything else is treated as a message event
//! whose body is base64-decoded and run through the frame decoder. Decoded
//! text is forwarded to the registered [`MessageSink`]. The router holds no
//! per-connection state; arbitrarily many `route` calls may run
//! concurrently.
//!
//! # Example
//!
//! ```
//! use sockgate::router::{Router, RouteOutcome};
//! use sockgate::event::ConnectionEvent;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> sockgate::Result<()> {
//! let router = Router::builder()
//!     .on_message(|text| async move {
//!         println!("got: {text}");
//!         Ok(())
//!     })
//!     .build();
//!
//! let event = ConnectionEvent::message(&[0x81, 0x02, b'h', b'i']);
//! match router.route(&event).await? {
//!     RouteOutcome::Reply(resp) => assert!(resp.is_success()),
//!     RouteOutcome::CloseConnection => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::{Result, SockgateError};
use crate::event::{ConnectionEvent, EventType};
use crate::protocol::{decode_frame, DecodedFrame};
use crate::response::GatewayResponse;

/// Boxed future for sink results.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The "emit decoded message" callback seam.
///
/// Implementations receive each decoded text payload. The forward call is
/// the one suspension point of a message-event dispatch; its failure is
/// surfaced to the caller unchanged, with no retry.
pub trait MessageSink: Send + Sync + 'static {
    /// Forward one decoded text message downstream.
    fn forward(&self, message: String) -> BoxFuture<'static, Result<()>>;
}

/// Adapter so async closures can be registered as sinks.
pub struct FnSink<F> {
    f: F,
}

impl<F, Fut> FnSink<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    /// Wrap a closure returning a future.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, Fut> MessageSink for FnSink<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    fn forward(&self, message: String) -> BoxFuture<'static, Result<()>> {
        Box::pin((self.f)(message))
    }
}

/// Default sink: logs the message and succeeds.
struct LogSink;

impl MessageSink for LogSink {
    fn forward(&self, message: String) -> BoxFuture<'static, Result<()>> {
        tracing::info!(len = message.len(), "received message from socket");
        Box::pin(async { Ok(()) })
    }
}

/// Outcome of routing one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Normal response to hand back to the transport.
    Reply(GatewayResponse),
    /// Peer sent a close frame; the caller should release the connection.
    CloseConnection,
}

/// Builder for configuring a [`Router`].
pub struct RouterBuilder {
    sink: Arc<dyn MessageSink>,
}

impl RouterBuilder {
    /// Create a builder with the default logging sink.
    pub fn new() -> Self {
        Self {
            sink: Arc::new(LogSink),
        }
    }

    /// Register the application callback for decoded text messages.
    pub fn on_message<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.sink = Arc::new(FnSink::new(f));
        self
    }

    /// Register a sink implementation directly.
    pub fn sink(mut self, sink: Arc<dyn MessageSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Build the router.
    pub fn build(self) -> Router {
        Router { sink: self.sink }
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateless per-event dispatcher.
pub struct Router {
    sink: Arc<dyn MessageSink>,
}

impl Router {
    /// Create a router builder.
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Route one inbound event.
    ///
    /// Connect/disconnect events are acknowledged without decoding.
    /// Message events go through the frame decoder; decode failures become
    /// a 400 reply rather than an error, so a bad frame never crashes the
    /// dispatcher. Sink failures propagate as `Err`.
    pub async fn route(&self, event: &ConnectionEvent) -> Result<RouteOutcome> {
        let origin = event.origin();
        match event.event_type() {
            EventType::Connect => {
                tracing::debug!(
                    connection_id = ?event.request_context.connection_id,
                    "connection established"
                );
                Ok(RouteOutcome::Reply(GatewayResponse::ok(
                    "Connected...",
                    origin,
                )?))
            }
            EventType::Disconnect => {
                tracing::debug!(
                    connection_id = ?event.request_context.connection_id,
                    "connection closed"
                );
                Ok(RouteOutcome::Reply(GatewayResponse::ok(
                    "Disconnected...",
                    origin,
                )?))
            }
            EventType::Message => self.route_message(event).await,
        }
    }

    async fn route_message(&self, event: &ConnectionEvent) -> Result<RouteOutcome> {
        let origin = event.origin();

        let bytes = match event.raw_body() {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(error = %err, "could not read message body");
                return Ok(RouteOutcome::Reply(GatewayResponse::bad_request(
                    &err.to_string(),
                    origin,
                )?));
            }
        };

        match decode_frame(&bytes) {
            Ok(DecodedFrame::Close) => {
                tracing::debug!("peer requested close");
                Ok(RouteOutcome::CloseConnection)
            }
            Ok(DecodedFrame::Ignored) => {
                Ok(RouteOutcome::Reply(GatewayResponse::no_content(origin)))
            }
            Ok(DecodedFrame::Text(message)) => {
                self.sink.forward(message).await?;
                Ok(RouteOutcome::Reply(GatewayResponse::ok("ok", origin)?))
            }
            Err(err @ (SockgateError::MalformedFrame(_)
            | SockgateError::UnsupportedFrame
            | SockgateError::Utf8(_))) => {
                tracing::warn!(error = %err, "frame decode failed");
                Ok(RouteOutcome::Reply(GatewayResponse::bad_request(
                    &err.to_string(),
                    origin,
                )?))
            }
            Err(other) => Err(other),
        }
    }
}
