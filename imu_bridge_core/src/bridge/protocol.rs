// imu_bridge_core/src/bridge/protocol.rs

//! rosbridge v2 JSON operations.
//!
//! Each operation is one JSON object with an `op` field:
//!
//! ```text
//! {"op": "advertise", "topic": "/imu", "type": "sensor_msgs/Imu"}
//! {"op": "publish",   "topic": "/imu", "msg": { ... }}
//! ```

use serde::Serialize;

use super::Result;
use crate::messages::{BridgeMessage, MessageType};

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation<'a> {
    Advertise {
        topic: &'a str,
        #[serde(rename = "type")]
        message_type: &'static str,
    },
    Publish {
        topic: &'a str,
        msg: &'a BridgeMessage,
    },
}

impl<'a> Operation<'a> {
    pub fn advertise(topic: &'a str, message_type: MessageType) -> Self {
        Operation::Advertise {
            topic,
            message_type: message_type.type_name(),
        }
    }

    pub fn publish(topic: &'a str, msg: &'a BridgeMessage) -> Self {
        Operation::Publish { topic, msg }
    }

    /// Serializes the operation into a single JSON frame.
    pub fn to_frame(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
