// imu_bridge_core/src/deriver.rs

use nalgebra::Vector3;

use crate::frames::{acceleration_to_sensor_axes, to_sensor_axes};
use crate::types::DerivedState;

/// Derives the sensor-frame state from two consecutive body velocities.
///
/// `dt` must be strictly positive; callers guard against the first tick and
/// paused steps (see [`SampleDeriver::sample`]).
pub fn derive(
    prev_velocity_local: &Vector3<f64>,
    curr_velocity_local: &Vector3<f64>,
    dt: f64,
    angular_velocity_world: &Vector3<f64>,
    gravity_y: f64,
) -> DerivedState {
    let accel_local = (curr_velocity_local - prev_velocity_local) / dt;

    DerivedState {
        linear_acceleration: acceleration_to_sensor_axes(&accel_local, gravity_y),
        angular_velocity: to_sensor_axes(angular_velocity_world),
    }
}

/// Why a sample produced no derived state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No previous velocity has been observed yet.
    FirstSample,
    /// The step duration was zero, negative or not finite.
    InvalidDt,
}

/// Finite-difference state: only the most recent velocity is retained.
#[derive(Debug, Clone, Default)]
pub struct SampleDeriver {
    previous_velocity: Option<Vector3<f64>>,
}

impl SampleDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_velocity(&self) -> Option<&Vector3<f64>> {
        self.previous_velocity.as_ref()
    }

    /// Records a velocity without deriving anything.
    pub fn observe(&mut self, velocity_local: Vector3<f64>) {
        self.previous_velocity = Some(velocity_local);
    }

    /// Derives against the stored velocity, then stores `velocity_local` for the next call.
    /// The stored velocity is updated even when the derivation is skipped.
    pub fn sample(
        &mut self,
        velocity_local: Vector3<f64>,
        dt: f64,
        angular_velocity_world: &Vector3<f64>,
        gravity_y: f64,
    ) -> Result<DerivedState, SkipReason> {
        let previous = self.previous_velocity.replace(velocity_local);

        let Some(previous) = previous else {
            return Err(SkipReason::FirstSample);
        };
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SkipReason::InvalidDt);
        }

        Ok(derive(
            &previous,
            &velocity_local,
            dt,
            angular_velocity_world,
            gravity_y,
        ))
    }
}
