// imu_bridge_sim/src/simulation/plugins/body.rs

use avian3d::prelude::{AngularVelocity, LinearVelocity, RigidBody};

use crate::prelude::*;

// =========================================================================
// == Body Components & Plugin ==
// =========================================================================

/// Marks the rigid body the IMU is mounted on.
#[derive(Component, Debug, Default)]
pub struct SensorBody;

/// A constant drive applied every fixed step.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct BodyDrive {
    /// Acceleration in the body frame (Bevy axes, -Z forward).
    pub acceleration_local: Vec3,
    /// Turn rate about the world vertical axis, in rad/s.
    pub yaw_rate: f32,
}

pub struct BodyPlugin;

impl Plugin for BodyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(AppState::Loading),
            spawn_body.in_set(SceneBuildSet::Body),
        )
        .add_systems(
            FixedUpdate,
            body_drive_system.in_set(SimulationSet::Actuation),
        );
    }
}

// =========================================================================
// == Spawning System ==
// =========================================================================

fn spawn_body(mut commands: Commands, config: Res<ScenarioConfig>) {
    let body = &config.body;
    let rotation = Quat::from_rotation_y(body.yaw_degrees.to_radians());
    let velocity_world = rotation * Vec3::from_array(body.linear_velocity);

    info!(
        "  -> Spawning body at {:?}, heading {:.1} deg",
        body.position, body.yaw_degrees
    );

    // Kinematic: the drive sets velocities directly and avian integrates the pose.
    commands.spawn((
        Name::new("imu_body"),
        SensorBody,
        RigidBody::Kinematic,
        Transform::from_translation(Vec3::from_array(body.position)).with_rotation(rotation),
        LinearVelocity(velocity_world),
        AngularVelocity(Vec3::Y * body.yaw_rate_degrees.to_radians()),
        BodyDrive {
            acceleration_local: Vec3::from_array(body.drive_acceleration),
            yaw_rate: body.yaw_rate_degrees.to_radians(),
        },
    ));
}

// =========================================================================
// == Runtime System ==
// =========================================================================

/// Integrates the body-frame drive into the world-frame velocities.
pub fn body_drive_system(
    time: Res<Time<Fixed>>,
    mut query: Query<(
        &BodyDrive,
        &Transform,
        &mut LinearVelocity,
        &mut AngularVelocity,
    )>,
) {
    let dt = time.delta_secs();
    for (drive, transform, mut linear, mut angular) in &mut query {
        linear.0 += transform.rotation * drive.acceleration_local * dt;
        angular.0 = Vec3::Y * drive.yaw_rate;
    }
}
