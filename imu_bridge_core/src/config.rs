// imu_bridge_core/src/config.rs

use serde::{Deserialize, Serialize};

use crate::types::TargetEnvironment;

/// Topic the autonomous-driving stack expects the corrected IMU pose on. Not configurable.
pub const APOLLO_CORRECTED_IMU_TOPIC: &str = "/apollo/sensor/gnss/corrected_imu";

/// Static configuration of one IMU sensor. Fixed for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ImuSensorConfig {
    #[serde(default = "default_imu_topic")]
    pub imu_topic: String,
    #[serde(default = "default_imu_frame_id")]
    pub imu_frame_id: String,
    #[serde(default = "default_odometry_topic")]
    pub odometry_topic: String,
    #[serde(default = "default_odometry_frame_id")]
    pub odometry_frame_id: String,
    #[serde(default = "default_odometry_child_frame_id")]
    pub odometry_child_frame_id: String,

    /// Which downstream stack to encode for.
    #[serde(default)]
    pub target_environment: TargetEnvironment,

    /// Administrative publish switch, independent of the sensor's enabled state.
    #[serde(default)]
    pub publish_messages: bool,
}

fn default_imu_topic() -> String {
    "/apollo/sensor/gnss/imu".to_string()
}
fn default_imu_frame_id() -> String {
    "/imu".to_string()
}
fn default_odometry_topic() -> String {
    "/odometry".to_string()
}
fn default_odometry_frame_id() -> String {
    "/odom".to_string()
}
fn default_odometry_child_frame_id() -> String {
    "/none".to_string()
}

impl Default for ImuSensorConfig {
    fn default() -> Self {
        Self {
            imu_topic: default_imu_topic(),
            imu_frame_id: default_imu_frame_id(),
            odometry_topic: default_odometry_topic(),
            odometry_frame_id: default_odometry_frame_id(),
            odometry_child_frame_id: default_odometry_child_frame_id(),
            target_environment: TargetEnvironment::default(),
            publish_messages: false,
        }
    }
}
