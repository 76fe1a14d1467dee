//! Downstream queue publishing.
//!
//! Decoded messages leave this crate through a [`Publisher`]. Records are
//! enveloped with a collection tag and an arrival timestamp before they go
//! out, so consumers can order and bucket them without trusting producer
//! clocks downstream of the gateway.
//!
//! [`ChannelPublisher`] is the in-process implementation, backed by a
//! `tokio::sync::mpsc` channel; real broker clients plug in behind the same
//! trait.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::config::GatewayConfig;
use crate::error::{Result, SockgateError};
use crate::router::{BoxFuture, MessageSink};

/// Collection tag stamped on every outgoing record.
pub const RECORD_COLLECTION: &str = "content";

/// One enveloped record bound for the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueRecord {
    /// Collection the record belongs to.
    pub collection: String,
    /// Milliseconds since the epoch at envelope time.
    pub micro_time_added: u64,
    /// Application payload.
    pub data: Value,
}

impl QueueRecord {
    /// Envelope a payload with the collection tag and current timestamp.
    pub fn new(data: Value) -> Self {
        let micro_time_added = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            collection: RECORD_COLLECTION.to_string(),
            micro_time_added,
            data,
        }
    }

    /// Envelope a raw text message.
    ///
    /// Text that parses as JSON is kept structured; anything else is
    /// carried as a JSON string.
    pub fn from_text(text: &str) -> Self {
        let data = serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()));
        Self::new(data)
    }
}

/// Queue publishing seam.
pub trait Publisher: Send + Sync + 'static {
    /// Publish one record to a topic.
    fn publish(&self, topic: &str, record: QueueRecord) -> BoxFuture<'static, Result<()>>;
}

/// Record delivered through a [`ChannelPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRecord {
    /// Destination topic.
    pub topic: String,
    /// The enveloped record.
    pub record: QueueRecord,
}

/// In-process publisher backed by a bounded channel.
#[derive(Clone)]
pub struct ChannelPublisher {
    tx: mpsc::Sender<PublishedRecord>,
}

impl ChannelPublisher {
    /// Create a publisher and the receiving end of its channel.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<PublishedRecord>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl Publisher for ChannelPublisher {
    fn publish(&self, topic: &str, record: QueueRecord) -> BoxFuture<'static, Result<()>> {
        let tx = self.tx.clone();
        let item = PublishedRecord {
            topic: topic.to_string(),
            record,
        };
        Box::pin(async move {
            tx.send(item)
                .await
                .map_err(|_| SockgateError::Publish("queue channel closed".to_string()))
        })
    }
}

/// [`MessageSink`] that envelopes forwarded text and publishes it to the
/// configured data topic.
pub struct QueueSink {
    publisher: Arc<dyn Publisher>,
    topic: String,
}

impl QueueSink {
    /// Create a sink publishing to the config's data topic.
    pub fn new(publisher: Arc<dyn Publisher>, config: &GatewayConfig) -> Self {
        Self {
            publisher,
            topic: config.data_topic(),
        }
    }
}

impl MessageSink for QueueSink {
    fn forward(&self, message: String) -> BoxFuture<'static, Result<()>> {
        let record = QueueRecord::from_text(&message);
        tracing::debug!(topic = %self.topic, "publishing decoded message");
        self.publisher.publish(&self.topic, record)
    }
}
