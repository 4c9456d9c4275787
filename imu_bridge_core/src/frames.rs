// imu_bridge_core/src/frames.rs

//! Axis and unit conventions shared by both output schemas.
//!
//! The simulation works in a Y-up engine frame. The sensor reports in a frame
//! where X is the engine's Z (forward), Y is the engine's negated X, and Z is the
//! engine's Y (up). Every schema uses this same swizzle.

use nalgebra::{UnitQuaternion, Vector3};

/// Degrees-to-radians factor used for every reported Euler angle.
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Remaps a vector from engine axes into sensor axes: `(z, -x, y)`.
pub fn to_sensor_axes(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.z, -v.x, v.y)
}

/// Remaps a body-frame acceleration into sensor axes.
///
/// The vertical axis is NOT the measured vertical acceleration: it always carries
/// the ambient gravity component `gravity_y`, exactly as given (e.g. `-9.81`).
pub fn acceleration_to_sensor_axes(accel_local: &Vector3<f64>, gravity_y: f64) -> Vector3<f64> {
    Vector3::new(accel_local.z, -accel_local.x, gravity_y)
}

// =========================================================================
// == Euler Angles ==
// =========================================================================

/// Rotation about each engine axis in degrees, wrapped into `[0, 360)`.
///
/// The decomposition order is the engine's: a rotation `R = Ry(y) * Rx(x) * Rz(z)`,
/// i.e. Z is applied first, then X, then Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineEulerDegrees {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EngineEulerDegrees {
    pub fn from_quaternion(q: &UnitQuaternion<f64>) -> Self {
        let m = q.to_rotation_matrix().into_inner();

        // m[(1, 2)] = -sin(x) for the Y-X-Z product.
        let sin_x = (-m[(1, 2)]).clamp(-1.0, 1.0);
        let x = sin_x.asin();

        let (y, z) = if sin_x.abs() < 1.0 - 1e-9 {
            (m[(0, 2)].atan2(m[(2, 2)]), m[(1, 0)].atan2(m[(1, 1)]))
        } else {
            // Gimbal lock: Y and Z rotate about the same axis, fold everything into Y.
            ((-m[(2, 0)]).atan2(m[(0, 0)]), 0.0)
        };

        Self {
            x: wrap_degrees(x.to_degrees()),
            y: wrap_degrees(y.to_degrees()),
            z: wrap_degrees(z.to_degrees()),
        }
    }
}

fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Roll/pitch/yaw in degrees, in the reporting convention of the autonomous-driving stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollPitchYaw {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl From<EngineEulerDegrees> for RollPitchYaw {
    /// roll = Z, pitch = -X, yaw = Y.
    fn from(e: EngineEulerDegrees) -> Self {
        Self {
            roll: e.z,
            pitch: -e.x,
            yaw: e.y,
        }
    }
}

impl RollPitchYaw {
    pub fn from_quaternion(q: &UnitQuaternion<f64>) -> Self {
        EngineEulerDegrees::from_quaternion(q).into()
    }

    /// `(roll, pitch, yaw)` converted to radians.
    pub fn to_radians(&self) -> Vector3<f64> {
        Vector3::new(self.roll, self.pitch, self.yaw) * DEG_TO_RAD
    }
}
