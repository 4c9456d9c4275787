// imu_bridge_core/src/messages/mod.rs

use serde::Serialize;

pub mod apollo;
pub mod ros;

// =========================================================================
// == Message Types ==
// =========================================================================

/// Every message type the IMU can publish. Used as the value of the publisher registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    ApolloImu,
    ApolloCorrectedImu,
    RosImu,
    RosOdometry,
}

impl MessageType {
    /// The type name announced to the bridge when advertising a topic.
    pub fn type_name(self) -> &'static str {
        match self {
            MessageType::ApolloImu => "pb_msgs/Imu",
            MessageType::ApolloCorrectedImu => "pb_msgs/CorrectedImu",
            MessageType::RosImu => "sensor_msgs/Imu",
            MessageType::RosOdometry => "nav_msgs/Odometry",
        }
    }
}

/// A fully-populated outgoing message.
/// Serializes as the bare message body, without any variant tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BridgeMessage {
    ApolloImu(apollo::Imu),
    ApolloCorrectedImu(apollo::CorrectedImu),
    RosImu(ros::Imu),
    RosOdometry(ros::Odometry),
}

impl BridgeMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            BridgeMessage::ApolloImu(_) => MessageType::ApolloImu,
            BridgeMessage::ApolloCorrectedImu(_) => MessageType::ApolloCorrectedImu,
            BridgeMessage::RosImu(_) => MessageType::RosImu,
            BridgeMessage::RosOdometry(_) => MessageType::RosOdometry,
        }
    }
}

/// A message paired with the topic it is published on.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicMessage {
    pub topic: String,
    pub message: BridgeMessage,
}

impl TopicMessage {
    pub fn new(topic: impl Into<String>, message: BridgeMessage) -> Self {
        Self {
            topic: topic.into(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_message_serializes_as_body() {
        let msg = BridgeMessage::ApolloImu(apollo::Imu {
            header: apollo::Header { timestamp_sec: 1.5 },
            measurement_time: 1.5,
            measurement_span: 0.02,
            linear_acceleration: apollo::Point3D::default(),
            angular_velocity: apollo::Point3D::default(),
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["header"]["timestamp_sec"], 1.5);
        assert!(json.get("ApolloImu").is_none());
        assert_eq!(msg.message_type().type_name(), "pb_msgs/Imu");
    }
}
