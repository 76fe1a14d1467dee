//! # sockgate
//!
//! WebSocket frame decoding and connection lifecycle routing for
//! gateway-style invocations.
//!
//! The crate has two cooperating cores with the decoder as the dependency
//! leaf:
//!
//! - **Frame decoder** ([`protocol`]): pure function from a byte buffer to
//!   a decoded message or control signal. No state, no I/O.
//! - **Lifecycle router** ([`router`]): stateless dispatcher over
//!   connect/disconnect/message events that runs the decoder and forwards
//!   text payloads to an application callback.
//!
//! Everything around them is a collaborator behind a seam: response
//! formatting ([`response`]), queue publishing ([`publish`]) and
//! environment configuration ([`config`]).
//!
//! ## Example
//!
//! ```
//! use sockgate::event::ConnectionEvent;
//! use sockgate::router::{RouteOutcome, Router};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> sockgate::Result<()> {
//! let router = Router::builder()
//!     .on_message(|text| async move {
//!         tracing::info!(%text, "application received message");
//!         Ok(())
//!     })
//!     .build();
//!
//! // Unmasked text frame "Hello", as delivered base64-encoded in the event body.
//! let event = ConnectionEvent::message(&[0x81, 0x05, b'H', b'e', b'l', b'l', b'o']);
//! assert!(matches!(router.route(&event).await?, RouteOutcome::Reply(_)));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod protocol;
pub mod publish;
pub mod response;
pub mod router;

pub use error::{Result, SockgateError};
pub use event::{ConnectionEvent, EventType};
pub use protocol::{decode_frame, DecodedFrame};
pub use response::GatewayResponse;
pub use router::{RouteOutcome, Router, RouterBuilder};
