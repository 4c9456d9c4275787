// imu_bridge_core/src/types.rs

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

// =========================================================================
// == Per-Tick Data ==
// =========================================================================

/// Raw motion state pulled from the body once per fixed timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    /// Linear velocity of the body, expressed in the body's LOCAL frame.
    pub linear_velocity_local: Vector3<f64>,
    /// Angular velocity of the body, expressed in the WORLD frame.
    pub angular_velocity_world: Vector3<f64>,
    /// Orientation of the body in the world frame.
    pub orientation_world: UnitQuaternion<f64>,
    /// Seconds elapsed since the previous sample.
    pub dt: f64,
    /// Vertical component of the ambient gravity vector (negative when it points down).
    pub gravity_y: f64,
}

/// Acceleration and angular velocity expressed in the sensor's output axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedState {
    pub linear_acceleration: Vector3<f64>,
    pub angular_velocity: Vector3<f64>,
}

// =========================================================================
// == States ==
// =========================================================================

/// The state of the pub/sub endpoint, as seen by the sensor. Read-only for the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        self == ConnectionState::Connected
    }
}

/// Operational state of the sensor, toggled from outside.
/// `Disabled` suppresses publication but not sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SensorState {
    #[default]
    Disabled,
    Enabled,
}

impl From<bool> for SensorState {
    fn from(enabled: bool) -> Self {
        if enabled {
            SensorState::Enabled
        } else {
            SensorState::Disabled
        }
    }
}

// =========================================================================
// == Target Ecosystems ==
// =========================================================================

/// The downstream stack the sensor is publishing for. Fixed for the sensor's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")] // "DuckietownRos1" in TOML maps to `DuckietownRos1`
pub enum TargetEnvironment {
    #[default]
    Apollo,
    Autoware,
    DuckietownRos1,
    DuckietownRos2,
}

/// A fixed message-encoding convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    /// Apollo `Imu` + `CorrectedImu` protobuf-style messages.
    Apollo,
    /// ROS `sensor_msgs/Imu` + `nav_msgs/Odometry`.
    Ros,
}

impl TargetEnvironment {
    /// The schema this environment is encoded with, if the IMU publishes for it at all.
    pub fn schema(self) -> Option<Schema> {
        match self {
            TargetEnvironment::Apollo => Some(Schema::Apollo),
            TargetEnvironment::DuckietownRos1 => Some(Schema::Ros),
            TargetEnvironment::Autoware | TargetEnvironment::DuckietownRos2 => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_apollo_and_ros1_select_a_schema() {
        assert_eq!(TargetEnvironment::Apollo.schema(), Some(Schema::Apollo));
        assert_eq!(TargetEnvironment::DuckietownRos1.schema(), Some(Schema::Ros));
        assert_eq!(TargetEnvironment::Autoware.schema(), None);
        assert_eq!(TargetEnvironment::DuckietownRos2.schema(), None);
    }

    #[test]
    fn initial_states_are_inactive() {
        assert_eq!(SensorState::default(), SensorState::Disabled);
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
        assert!(!ConnectionState::default().is_connected());
    }
}
