// imu_bridge_core/src/bridge/recording.rs

use super::{BridgeClient, BridgeError, PublisherRegistry, Result};
use crate::messages::{BridgeMessage, MessageType, TopicMessage};
use crate::types::ConnectionState;

/// An in-memory bridge that keeps everything it is given.
/// Publishing while disconnected is rejected, like a real transport would.
#[derive(Debug, Clone, Default)]
pub struct RecordingBridge {
    state: ConnectionState,
    registry: PublisherRegistry,
    registrations: Vec<(String, MessageType)>,
    published: Vec<TopicMessage>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected() -> Self {
        Self {
            state: ConnectionState::Connected,
            ..Default::default()
        }
    }

    pub fn set_connection_state(&mut self, state: ConnectionState) {
        self.state = state;
    }

    pub fn registry(&self) -> &PublisherRegistry {
        &self.registry
    }

    /// Every `register_publisher` call, in order, including repeats.
    pub fn registrations(&self) -> &[(String, MessageType)] {
        &self.registrations
    }

    pub fn published(&self) -> &[TopicMessage] {
        &self.published
    }

    pub fn published_on<'a>(&'a self, topic: &'a str) -> impl Iterator<Item = &'a BridgeMessage> {
        self.published
            .iter()
            .filter(move |m| m.topic == topic)
            .map(|m| &m.message)
    }

    /// Removes and returns everything published so far.
    pub fn drain(&mut self) -> Vec<TopicMessage> {
        std::mem::take(&mut self.published)
    }
}

impl BridgeClient for RecordingBridge {
    fn connection_state(&self) -> ConnectionState {
        self.state
    }

    fn register_publisher(&mut self, topic: &str, message_type: MessageType) -> Result<()> {
        self.registry.register(topic, message_type)?;
        self.registrations.push((topic.to_string(), message_type));
        Ok(())
    }

    fn publish(&mut self, topic: &str, message: &BridgeMessage) -> Result<()> {
        if !self.state.is_connected() {
            return Err(BridgeError::NotConnected);
        }
        self.registry.check(topic, message)?;
        self.published
            .push(TopicMessage::new(topic, message.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::apollo;

    fn corrected() -> BridgeMessage {
        BridgeMessage::ApolloCorrectedImu(apollo::CorrectedImu {
            header: apollo::Header::default(),
            imu: apollo::Pose::default(),
        })
    }

    #[test]
    fn publish_requires_connection() {
        let mut bridge = RecordingBridge::new();
        bridge
            .register_publisher("/c", MessageType::ApolloCorrectedImu)
            .unwrap();
        assert!(matches!(
            bridge.publish("/c", &corrected()),
            Err(BridgeError::NotConnected)
        ));

        bridge.set_connection_state(ConnectionState::Connected);
        bridge.publish("/c", &corrected()).unwrap();
        assert_eq!(bridge.published_on("/c").count(), 1);
        assert_eq!(bridge.drain().len(), 1);
        assert!(bridge.published().is_empty());
    }
}
