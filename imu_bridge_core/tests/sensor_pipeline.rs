// imu_bridge_core/tests/sensor_pipeline.rs

//! Drives `ImuSensor` end to end through a `RecordingBridge`.

use approx::assert_abs_diff_eq;
use imu_bridge_core::deriver::SkipReason;
use imu_bridge_core::messages::{apollo, ros};
use imu_bridge_core::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};

const DT: f64 = 0.02;
const G: f64 = -9.81;

fn sample(velocity: Vector3<f64>) -> MotionSample {
    MotionSample {
        linear_velocity_local: velocity,
        angular_velocity_world: Vector3::new(1.0, 2.0, 3.0),
        orientation_world: UnitQuaternion::identity(),
        dt: DT,
        gravity_y: G,
    }
}

fn sensor(env: TargetEnvironment, publish_messages: bool, enabled: bool) -> ImuSensor {
    let mut sensor = ImuSensor::new(ImuSensorConfig {
        target_environment: env,
        publish_messages,
        ..Default::default()
    })
    .with_clock(FixedClock::from_unix_seconds(1_600_000_000, 500_000_000));
    sensor.set_enabled(enabled);
    sensor
}

fn apollo_imus(bridge: &RecordingBridge) -> Vec<&apollo::Imu> {
    bridge
        .published()
        .iter()
        .filter_map(|m| match &m.message {
            BridgeMessage::ApolloImu(imu) => Some(imu),
            _ => None,
        })
        .collect()
}

fn ros_headers(bridge: &RecordingBridge) -> Vec<(&'static str, &ros::Header)> {
    bridge
        .published()
        .iter()
        .map(|m| match &m.message {
            BridgeMessage::RosImu(imu) => ("imu", &imu.header),
            BridgeMessage::RosOdometry(odom) => ("odom", &odom.header),
            other => panic!("unexpected message {:?}", other),
        })
        .collect()
}

#[test]
fn only_the_fully_open_gate_publishes() {
    for connected in [false, true] {
        for publishing in [false, true] {
            for enabled in [false, true] {
                let mut sensor = sensor(TargetEnvironment::Apollo, publishing, enabled);
                let mut bridge = if connected {
                    RecordingBridge::connected()
                } else {
                    RecordingBridge::new()
                };

                sensor.tick(&sample(Vector3::zeros()), &mut bridge);
                let outcome = sensor.tick(&sample(Vector3::new(0.0, 0.0, 1.0)), &mut bridge);

                if connected && publishing && enabled {
                    assert_eq!(outcome, TickOutcome::Published { messages: 2 });
                    assert_eq!(bridge.published().len(), 2);
                } else {
                    assert_eq!(
                        outcome,
                        TickOutcome::Gated,
                        "connected={connected} publishing={publishing} enabled={enabled}"
                    );
                    assert!(bridge.published().is_empty());
                }
            }
        }
    }
}

#[test]
fn worked_example_reaches_the_wire() {
    let mut sensor = sensor(TargetEnvironment::Apollo, true, true);
    let mut bridge = RecordingBridge::connected();

    assert_eq!(
        sensor.tick(&sample(Vector3::new(2.0, 0.0, 0.0)), &mut bridge),
        TickOutcome::Skipped(SkipReason::FirstSample)
    );
    sensor.tick(&sample(Vector3::new(2.0, 1.0, 0.0)), &mut bridge);

    let imus = apollo_imus(&bridge);
    assert_eq!(imus.len(), 1);
    let imu = imus[0];

    assert_abs_diff_eq!(imu.linear_acceleration.x, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(imu.linear_acceleration.y, 0.0, epsilon = 1e-9);
    assert_eq!(imu.linear_acceleration.z, G);
    assert_eq!(
        imu.angular_velocity,
        apollo::Point3D {
            x: 3.0,
            y: -1.0,
            z: 2.0
        }
    );
    assert_abs_diff_eq!(imu.measurement_time, 1_600_000_000.5, epsilon = 1e-6);
    assert_abs_diff_eq!(imu.measurement_span as f64, DT, epsilon = 1e-6);

    let corrected: Vec<_> = bridge
        .published_on(APOLLO_CORRECTED_IMU_TOPIC)
        .collect();
    assert_eq!(corrected.len(), 1);
}

#[test]
fn ros_sequence_is_shared_per_tick_and_increments_across_ticks() {
    let mut sensor = sensor(TargetEnvironment::DuckietownRos1, true, true);
    let mut bridge = RecordingBridge::connected();

    for i in 0..4 {
        sensor.tick(&sample(Vector3::new(0.0, 0.0, i as f64)), &mut bridge);
    }

    let headers = ros_headers(&bridge);
    let seqs: Vec<_> = headers.iter().map(|(kind, h)| (*kind, h.seq)).collect();
    assert_eq!(
        seqs,
        vec![
            ("imu", 0),
            ("odom", 0),
            ("imu", 1),
            ("odom", 1),
            ("imu", 2),
            ("odom", 2),
        ]
    );
    assert_eq!(headers[0].1.frame_id, "/imu");
    assert_eq!(headers[1].1.frame_id, "/odom");
}

#[test]
fn gated_and_skipped_ticks_do_not_advance_sequence() {
    let mut sensor = sensor(TargetEnvironment::DuckietownRos1, true, true);
    let mut bridge = RecordingBridge::connected();

    sensor.tick(&sample(Vector3::zeros()), &mut bridge);
    sensor.tick(&sample(Vector3::zeros()), &mut bridge);
    assert_eq!(sensor.next_sequence(), 1);

    sensor.set_enabled(false);
    for _ in 0..3 {
        assert_eq!(
            sensor.tick(&sample(Vector3::zeros()), &mut bridge),
            TickOutcome::Gated
        );
    }
    assert_eq!(sensor.next_sequence(), 1);

    sensor.set_enabled(true);
    let mut zero_dt = sample(Vector3::zeros());
    zero_dt.dt = 0.0;
    assert_eq!(
        sensor.tick(&zero_dt, &mut bridge),
        TickOutcome::Skipped(SkipReason::InvalidDt)
    );
    assert_eq!(sensor.next_sequence(), 1);

    sensor.tick(&sample(Vector3::zeros()), &mut bridge);
    let last = ros_headers(&bridge);
    assert_eq!(last.last().map(|(_, h)| h.seq), Some(1));
}

#[test]
fn acceleration_is_continuous_after_re_enabling() {
    let mut sensor = sensor(TargetEnvironment::Apollo, true, true);
    let mut bridge = RecordingBridge::connected();

    sensor.tick(&sample(Vector3::zeros()), &mut bridge);

    // The body speeds up while the sensor is off.
    sensor.set_enabled(false);
    sensor.tick(&sample(Vector3::new(0.0, 0.0, 5.0)), &mut bridge);
    sensor.set_enabled(true);

    // Same velocity as the last gated tick: no spurious spike.
    sensor.tick(&sample(Vector3::new(0.0, 0.0, 5.0)), &mut bridge);

    let imus = apollo_imus(&bridge);
    assert_eq!(imus.len(), 1);
    assert_abs_diff_eq!(imus[0].linear_acceleration.x, 0.0, epsilon = 1e-9);
}

#[test]
fn registration_follows_environment_on_connect() {
    let mut apollo = sensor(TargetEnvironment::Apollo, false, false);
    let mut bridge = RecordingBridge::connected();
    apollo.tick(&sample(Vector3::zeros()), &mut bridge);
    assert_eq!(
        bridge.registrations(),
        &[
            ("/apollo/sensor/gnss/imu".to_string(), MessageType::ApolloImu),
            (
                APOLLO_CORRECTED_IMU_TOPIC.to_string(),
                MessageType::ApolloCorrectedImu
            ),
        ]
    );

    let mut ros = sensor(TargetEnvironment::DuckietownRos1, false, false);
    let mut bridge = RecordingBridge::connected();
    ros.tick(&sample(Vector3::zeros()), &mut bridge);
    assert_eq!(bridge.registry().get("/odometry"), Some(MessageType::RosOdometry));
    assert_eq!(
        bridge.registry().get("/apollo/sensor/gnss/imu"),
        Some(MessageType::RosImu)
    );
}
