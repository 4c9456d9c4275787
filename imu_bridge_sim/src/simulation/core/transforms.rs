// imu_bridge_sim/src/simulation/core/transforms.rs

//! Conversions from Bevy's math types into the frame the IMU core expects.
//!
//! Both frames are Y-up with X to the right. Bevy is right-handed and looks
//! down -Z; the IMU's engine frame is left-handed and looks down +Z. Going
//! from one to the other is a reflection of Z, so polar vectors flip Z while
//! axial vectors (angular velocity, rotation axes) flip X and Y instead.

use bevy::prelude::{Quat as BevyQuat, Vec3 as BevyVec3};
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

// =========================================================================
// == Bevy -> Engine Frame ==
// =========================================================================

/// Velocities, accelerations and positions.
pub fn bevy_vector_to_engine_vector(v: &BevyVec3) -> Vector3<f64> {
    Vector3::new(v.x as f64, v.y as f64, -v.z as f64)
}

/// Angular velocity. A left turn in Bevy (+Y) is a negative yaw rate in the engine frame.
pub fn bevy_angular_to_engine_angular(w: &BevyVec3) -> Vector3<f64> {
    Vector3::new(-w.x as f64, -w.y as f64, w.z as f64)
}

/// Orientation. Conjugation by the Z reflection: `q' = M q M`.
pub fn bevy_quat_to_engine_quat(q: &BevyQuat) -> UnitQuaternion<f64> {
    UnitQuaternion::from_quaternion(Quaternion::new(
        q.w as f64,
        -q.x as f64,
        -q.y as f64,
        q.z as f64,
    ))
}
