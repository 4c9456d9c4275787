// imu_bridge_core/src/messages/ros.rs

//! Wire definitions for the standard robotics stack (`std_msgs`, `geometry_msgs`,
//! `sensor_msgs`, `nav_msgs`). Field names match the ROS message definitions.

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::time::RosTime;

/// Length of a flattened 3x3 covariance matrix.
pub const COVARIANCE_3X3_LEN: usize = 9;
/// Length of a flattened 6x6 covariance matrix.
pub const COVARIANCE_6X6_LEN: usize = 36;

/// A covariance reported as unknown.
pub fn zero_covariance(len: usize) -> Vec<f64> {
    vec![0.0; len]
}

// =========================================================================
// == std_msgs / geometry_msgs ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Header {
    pub seq: u32,
    pub stamp: RosTime,
    pub frame_id: String,
}

/// A free vector. Only the rotational part of a transform applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<&na::Vector3<f64>> for Vector3 {
    fn from(v: &na::Vector3<f64>) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

impl From<&na::UnitQuaternion<f64>> for Quaternion {
    fn from(q: &na::UnitQuaternion<f64>) -> Self {
        let c = q.coords; // stored as [i, j, k, w]
        Self {
            x: c.x,
            y: c.y,
            z: c.z,
            w: c.w,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    pub orientation: Quaternion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseWithCovariance {
    pub pose: Pose,
    pub covariance: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Twist {
    pub linear: Vector3,
    pub angular: Vector3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwistWithCovariance {
    pub twist: Twist,
    pub covariance: Vec<f64>,
}

// =========================================================================
// == sensor_msgs / nav_msgs ==
// =========================================================================

/// `sensor_msgs/Imu`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Imu {
    pub header: Header,
    pub orientation: Quaternion,
    pub orientation_covariance: Vec<f64>,
    pub angular_velocity: Vector3,
    pub angular_velocity_covariance: Vec<f64>,
    pub linear_acceleration: Vector3,
    pub linear_acceleration_covariance: Vec<f64>,
}

/// `nav_msgs/Odometry`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Odometry {
    pub header: Header,
    pub child_frame_id: String,
    pub pose: PoseWithCovariance,
    pub twist: TwistWithCovariance,
}
