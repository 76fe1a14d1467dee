//! Environment-driven configuration for the downstream queue.

use crate::error::{Result, SockgateError};

/// Environment variable holding the comma-separated broker list.
pub const ENV_BROKER: &str = "KAFKA_BROKER";

/// Environment variable holding the data topic prefix.
pub const ENV_TOPIC_PREFIX: &str = "KAFKA_DATA_TOPIC_PREFIX";

/// Queue configuration resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Broker addresses.
    pub brokers: Vec<String>,
    /// Topic prefix; the data topic is `{prefix}_0`.
    pub topic_prefix: String,
}

impl GatewayConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an injectable variable lookup.
    ///
    /// # Errors
    ///
    /// [`SockgateError::Config`] when a required variable is missing or
    /// the broker list is empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let brokers_raw = lookup(ENV_BROKER)
            .ok_or_else(|| SockgateError::Config(format!("missing {ENV_BROKER}")))?;
        let topic_prefix = lookup(ENV_TOPIC_PREFIX)
            .ok_or_else(|| SockgateError::Config(format!("missing {ENV_TOPIC_PREFIX}")))?;

        let brokers: Vec<String> = brokers_raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if brokers.is_empty() {
            return Err(SockgateError::Config(format!("{ENV_BROKER} is empty")));
        }

        Ok(Self {
            brokers,
            topic_prefix,
        })
    }

    /// Name of the data topic records are published to.
    pub fn data_topic(&self) -> String {
        format!("{}_0", self.topic_prefix)
    }
}
