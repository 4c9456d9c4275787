// imu_bridge_core/src/messages/apollo.rs

//! Wire definitions for the autonomous-driving stack (`pb_msgs`).
//! Optional pose fields are left out of the encoded message when unset.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Header {
    /// Unix-epoch seconds.
    pub timestamp_sec: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<&Vector3<f64>> for Point3D {
    fn from(v: &Vector3<f64>) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// East/north/up position of the vehicle reference point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointENU {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quaternion {
    pub qx: f64,
    pub qy: f64,
    pub qz: f64,
    pub qw: f64,
}

/// `pb_msgs/Imu`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Imu {
    pub header: Header,
    pub measurement_time: f64,
    /// Duration of the tick the measurement covers, in seconds.
    pub measurement_span: f32,
    pub linear_acceleration: Point3D,
    pub angular_velocity: Point3D,
}

/// Pose block of the corrected IMU message.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PointENU>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Quaternion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear_velocity: Option<Point3D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear_acceleration: Option<Point3D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angular_velocity: Option<Point3D>,
    /// Heading in DEGREES. Unlike `euler_angles`, this field is not converted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear_acceleration_vrf: Option<Point3D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angular_velocity_vrf: Option<Point3D>,
    /// Roll/pitch/yaw in radians.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub euler_angles: Option<Point3D>,
}

/// `pb_msgs/CorrectedImu`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectedImu {
    pub header: Header,
    pub imu: Pose,
}
