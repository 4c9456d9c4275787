// imu_bridge_sim/src/simulation/plugins/sensors/imu.rs
use avian3d::prelude::{AngularVelocity, Gravity, LinearVelocity};
use nalgebra::{UnitQuaternion, Vector3};

// --- Simulation Crate Imports ---
use crate::prelude::*;
use crate::simulation::core::transforms::{
    bevy_angular_to_engine_angular, bevy_quat_to_engine_quat, bevy_vector_to_engine_vector,
};
use crate::simulation::plugins::body::SensorBody;
use crate::simulation::plugins::bridge::BridgeConnection;

// --- Core Library Imports ---
use imu_bridge_core::sensor::{ImuSensor, MotionSource, TickOutcome};

// =========================================================================
// == IMU Events & Plugin ==
// =========================================================================

/// Turns every IMU in the scene on or off.
#[derive(Event, Debug, Clone, Copy)]
pub struct SetImuEnabled(pub bool);

pub struct ImuPlugin;

impl Plugin for ImuPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SetImuEnabled>()
            .add_systems(
                OnEnter(AppState::Loading),
                // The spawning system
                attach_imu_sensors.in_set(SceneBuildSet::Sensors),
            )
            .add_systems(
                FixedUpdate,
                // The runtime sensor simulation system
                (apply_enable_requests, imu_sensor_system)
                    .chain()
                    .in_set(SimulationSet::Sensors),
            );
    }
}

// =========================================================================
// == Motion Source Adapter ==
// =========================================================================

/// Reads one avian body as the IMU's motion source.
///
/// The body must be a root entity so its `Transform` is its world pose.
pub struct BodyMotion<'a> {
    pub transform: &'a Transform,
    pub linear_velocity: &'a LinearVelocity,
    pub angular_velocity: &'a AngularVelocity,
    pub gravity: &'a Gravity,
    pub dt: f32,
}

impl MotionSource for BodyMotion<'_> {
    fn linear_velocity(&self) -> Vector3<f64> {
        // avian reports world-frame velocity; the IMU wants it in the body frame.
        let local = self.transform.rotation.inverse() * self.linear_velocity.0;
        bevy_vector_to_engine_vector(&local)
    }

    fn angular_velocity(&self) -> Vector3<f64> {
        bevy_angular_to_engine_angular(&self.angular_velocity.0)
    }

    fn orientation(&self) -> UnitQuaternion<f64> {
        bevy_quat_to_engine_quat(&self.transform.rotation)
    }

    fn tick_delta_seconds(&self) -> f32 {
        self.dt
    }

    fn gravity(&self) -> f32 {
        self.gravity.0.y
    }
}

// =========================================================================
// == Spawning System ==
// =========================================================================

/// Mounts an IMU, built from the scenario config, on every sensor body.
fn attach_imu_sensors(
    mut commands: Commands,
    config: Res<ScenarioConfig>,
    body_query: Query<(Entity, &Name), With<SensorBody>>,
) {
    for (entity, name) in &body_query {
        let mut sensor = ImuSensor::new(config.imu.sensor.clone());
        sensor.set_enabled(config.imu.enabled);

        info!(
            "  -> Attaching IMU to '{}' ({:?}, publishing: {}, enabled: {})",
            name.as_str(),
            config.imu.sensor.target_environment,
            config.imu.sensor.publish_messages,
            config.imu.enabled
        );
        commands.entity(entity).insert(sensor);
    }
}

// =========================================================================
// == Runtime Systems ==
// =========================================================================

fn apply_enable_requests(
    mut requests: EventReader<SetImuEnabled>,
    mut sensors: Query<&mut ImuSensor>,
) {
    // Only the latest request of the step matters.
    let Some(SetImuEnabled(enabled)) = requests.read().last().copied() else {
        return;
    };
    info!("IMU {}", if enabled { "enabled" } else { "disabled" });
    for mut sensor in &mut sensors {
        sensor.set_enabled(enabled);
    }
}

/// Runs once per fixed step: samples each body and publishes through the bridge.
pub fn imu_sensor_system(
    time: Res<Time<Fixed>>,
    gravity: Res<Gravity>,
    mut bridge: ResMut<BridgeConnection>,
    mut sensor_query: Query<(
        Entity,
        &mut ImuSensor,
        &Transform,
        &LinearVelocity,
        &AngularVelocity,
    )>,
) {
    let dt = time.delta_secs();

    for (entity, mut sensor, transform, linear_velocity, angular_velocity) in &mut sensor_query {
        let motion = BodyMotion {
            transform,
            linear_velocity,
            angular_velocity,
            gravity: &gravity,
            dt,
        };

        if let TickOutcome::Published { messages: 0 } = sensor.tick(&motion, bridge.client()) {
            debug!("IMU {:?} produced no messages this step", entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use imu_bridge_core::config::ImuSensorConfig;
    use imu_bridge_core::messages::BridgeMessage;
    use imu_bridge_core::time::FixedClock;
    use imu_bridge_core::types::TargetEnvironment;
    use std::time::Duration;

    fn test_app() -> (App, Entity) {
        let mut app = App::new();
        app.init_resource::<Time<Fixed>>()
            .insert_resource(Gravity(Vec3::new(0.0, -9.81, 0.0)))
            .insert_resource(BridgeConnection::recording())
            .add_event::<SetImuEnabled>()
            .add_systems(
                FixedUpdate,
                (apply_enable_requests, imu_sensor_system).chain(),
            );

        let mut sensor = ImuSensor::new(ImuSensorConfig {
            target_environment: TargetEnvironment::Apollo,
            publish_messages: true,
            ..Default::default()
        })
        .with_clock(FixedClock::from_unix_seconds(1_700_000_000, 0));
        sensor.set_enabled(true);

        let entity = app
            .world_mut()
            .spawn((
                sensor,
                Transform::IDENTITY,
                LinearVelocity(Vec3::ZERO),
                AngularVelocity(Vec3::new(0.0, 1.0, 0.0)),
            ))
            .id();
        (app, entity)
    }

    fn step(app: &mut App) {
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(Duration::from_millis(20));
        app.world_mut().run_schedule(FixedUpdate);
    }

    fn published_count(app: &App) -> usize {
        app.world()
            .resource::<BridgeConnection>()
            .as_recording()
            .map(|r| r.published().len())
            .unwrap_or(0)
    }

    #[test]
    fn forward_acceleration_reaches_sensor_x() {
        let (mut app, entity) = test_app();

        // First step only seeds the previous velocity.
        step(&mut app);
        assert_eq!(published_count(&app), 0);

        // 1 m/s forward (Bevy -Z) after 20 ms: 50 m/s^2 forward.
        app.world_mut()
            .get_mut::<LinearVelocity>(entity)
            .unwrap()
            .0 = Vec3::new(0.0, 0.0, -1.0);
        step(&mut app);

        let bridge = app.world().resource::<BridgeConnection>();
        let recording = bridge.as_recording().unwrap();
        assert_eq!(recording.published().len(), 2);

        let BridgeMessage::ApolloImu(imu) = &recording.published()[0].message else {
            panic!("expected apollo imu first");
        };
        assert_relative_eq!(imu.linear_acceleration.x, 50.0, epsilon = 1e-3);
        assert_relative_eq!(imu.linear_acceleration.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(imu.linear_acceleration.z, -9.81, epsilon = 1e-5);

        // A left turn in Bevy reads as a negative rate about the sensor's Z.
        assert_relative_eq!(imu.angular_velocity.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(imu.angular_velocity.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(imu.angular_velocity.z, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn disable_event_stops_publication() {
        let (mut app, _) = test_app();
        app.world_mut().send_event(SetImuEnabled(false));

        for _ in 0..3 {
            step(&mut app);
        }
        assert_eq!(published_count(&app), 0);

        app.world_mut().send_event(SetImuEnabled(true));
        step(&mut app);
        assert_eq!(published_count(&app), 2);
    }

    #[test]
    fn body_motion_reports_local_velocity() {
        let transform = Transform::from_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        // Facing -X; moving along world -X is moving forward.
        let motion = BodyMotion {
            transform: &transform,
            linear_velocity: &LinearVelocity(Vec3::new(-3.0, 0.0, 0.0)),
            angular_velocity: &AngularVelocity(Vec3::ZERO),
            gravity: &Gravity(Vec3::new(0.0, -9.81, 0.0)),
            dt: 0.01,
        };
        let v = motion.linear_velocity();
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(v.z, 3.0, epsilon = 1e-5);
        assert_relative_eq!(motion.gravity(), -9.81);
    }
}
