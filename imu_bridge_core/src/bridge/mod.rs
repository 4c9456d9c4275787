// imu_bridge_core/src/bridge/mod.rs

//! The pub/sub endpoint the sensor publishes through.
//!
//! The core only needs three operations from a bridge (see [`BridgeClient`]).
//! Two implementations ship with the crate: an in-memory [`RecordingBridge`] and
//! a rosbridge-protocol [`TcpRosBridge`].

use std::collections::HashMap;
use thiserror::Error;

use crate::messages::{BridgeMessage, MessageType};
use crate::types::ConnectionState;

pub mod protocol;
pub mod recording;
pub mod tcp;

pub use recording::RecordingBridge;
pub use tcp::{TcpBridgeConfig, TcpRosBridge};

// =========================================================================
// == Errors ==
// =========================================================================

/// Result type alias
pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Topic '{0}' has no registered publisher")]
    UnregisteredTopic(String),

    #[error("Topic '{topic}' is registered as {registered}, cannot publish {attempted}")]
    TypeMismatch {
        topic: String,
        registered: &'static str,
        attempted: &'static str,
    },

    #[error("Bridge is not connected")]
    NotConnected,

    #[error("Outgoing queue is full, dropped message for '{0}'")]
    QueueFull(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// =========================================================================
// == Bridge Contract ==
// =========================================================================

/// The contract the sensor needs from a pub/sub transport.
///
/// `publish` must not block the caller: retries and backpressure belong to the bridge.
pub trait BridgeClient {
    fn connection_state(&self) -> ConnectionState;

    /// Declares that `topic` will carry messages of `message_type`.
    fn register_publisher(&mut self, topic: &str, message_type: MessageType) -> Result<()>;

    fn publish(&mut self, topic: &str, message: &BridgeMessage) -> Result<()>;
}

// =========================================================================
// == Publisher Registry ==
// =========================================================================

/// Typed topic registry: each topic is bound to exactly one message type.
#[derive(Debug, Clone, Default)]
pub struct PublisherRegistry {
    topics: HashMap<String, MessageType>,
}

impl PublisherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `topic` to `message_type`. Returns `true` if the binding is new.
    /// Re-registering with the same type is a no-op; a different type is an error.
    pub fn register(&mut self, topic: &str, message_type: MessageType) -> Result<bool> {
        match self.topics.get(topic) {
            Some(existing) if *existing == message_type => Ok(false),
            Some(existing) => Err(BridgeError::TypeMismatch {
                topic: topic.to_string(),
                registered: existing.type_name(),
                attempted: message_type.type_name(),
            }),
            None => {
                self.topics.insert(topic.to_string(), message_type);
                Ok(true)
            }
        }
    }

    /// Checks that `message` may be published on `topic`.
    pub fn check(&self, topic: &str, message: &BridgeMessage) -> Result<MessageType> {
        let registered = self
            .topics
            .get(topic)
            .ok_or_else(|| BridgeError::UnregisteredTopic(topic.to_string()))?;
        let attempted = message.message_type();
        if *registered != attempted {
            return Err(BridgeError::TypeMismatch {
                topic: topic.to_string(),
                registered: registered.type_name(),
                attempted: attempted.type_name(),
            });
        }
        Ok(attempted)
    }

    pub fn get(&self, topic: &str) -> Option<MessageType> {
        self.topics.get(topic).copied()
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}
