// imu_bridge_core/src/encoder.rs

use nalgebra::UnitQuaternion;

use crate::config::{ImuSensorConfig, APOLLO_CORRECTED_IMU_TOPIC};
use crate::frames::RollPitchYaw;
use crate::messages::ros::{zero_covariance, COVARIANCE_3X3_LEN, COVARIANCE_6X6_LEN};
use crate::messages::{apollo, ros, BridgeMessage, MessageType, TopicMessage};
use crate::time::{Clock, RosTime};
use crate::types::{DerivedState, Schema, TargetEnvironment};

// =========================================================================
// == Timestamp & Sequence Bookkeeping ==
// =========================================================================

/// Per-tick values shared by every message built in that tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PublicationContext {
    /// Unix-epoch seconds at the publish instant.
    pub measurement_time_seconds: f64,
    /// Duration of the current tick.
    pub measurement_span_seconds: f32,
    /// Header sequence number for the odometry-style messages of this tick.
    pub sequence_number: u32,
}

/// Monotonic header sequence. Starts at 0 and never resets during a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceCounter(u32);

impl SequenceCounter {
    pub fn current(&self) -> u32 {
        self.0
    }

    /// Returns the current value and moves to the next one.
    pub fn advance(&mut self) -> u32 {
        let current = self.0;
        self.0 = self.0.wrapping_add(1);
        current
    }
}

// =========================================================================
// == Encoder ==
// =========================================================================

/// Builds the outgoing messages for one tick. Holds the configured topics and frame ids.
#[derive(Debug, Clone)]
pub struct SchemaEncoder {
    imu_topic: String,
    imu_frame_id: String,
    odometry_topic: String,
    odometry_frame_id: String,
    odometry_child_frame_id: String,
}

impl SchemaEncoder {
    pub fn new(config: &ImuSensorConfig) -> Self {
        Self {
            imu_topic: config.imu_topic.clone(),
            imu_frame_id: config.imu_frame_id.clone(),
            odometry_topic: config.odometry_topic.clone(),
            odometry_frame_id: config.odometry_frame_id.clone(),
            odometry_child_frame_id: config.odometry_child_frame_id.clone(),
        }
    }

    /// The (topic, type) pairs to register with the bridge for `env`.
    pub fn publishers(&self, env: TargetEnvironment) -> Vec<(String, MessageType)> {
        match env.schema() {
            Some(Schema::Apollo) => vec![
                (self.imu_topic.clone(), MessageType::ApolloImu),
                (
                    APOLLO_CORRECTED_IMU_TOPIC.to_string(),
                    MessageType::ApolloCorrectedImu,
                ),
            ],
            Some(Schema::Ros) => vec![
                (self.imu_topic.clone(), MessageType::RosImu),
                (self.odometry_topic.clone(), MessageType::RosOdometry),
            ],
            None => Vec::new(),
        }
    }

    /// Encodes `derived` for the given environment. Environments without a schema yield nothing.
    pub fn encode(
        &self,
        env: TargetEnvironment,
        derived: &DerivedState,
        orientation_world: &UnitQuaternion<f64>,
        ctx: &PublicationContext,
        clock: &dyn Clock,
    ) -> Vec<TopicMessage> {
        match env.schema() {
            Some(Schema::Apollo) => self.encode_apollo(derived, orientation_world, ctx),
            Some(Schema::Ros) => self.encode_ros(derived, orientation_world, ctx, clock),
            None => Vec::new(),
        }
    }

    fn encode_apollo(
        &self,
        derived: &DerivedState,
        orientation_world: &UnitQuaternion<f64>,
        ctx: &PublicationContext,
    ) -> Vec<TopicMessage> {
        let header = apollo::Header {
            timestamp_sec: ctx.measurement_time_seconds,
        };
        let linear_acceleration = apollo::Point3D::from(&derived.linear_acceleration);
        let angular_velocity = apollo::Point3D::from(&derived.angular_velocity);

        let imu = apollo::Imu {
            header,
            measurement_time: ctx.measurement_time_seconds,
            measurement_span: ctx.measurement_span_seconds,
            linear_acceleration,
            angular_velocity,
        };

        let rpy = RollPitchYaw::from_quaternion(orientation_world);
        let corrected = apollo::CorrectedImu {
            header,
            imu: apollo::Pose {
                linear_acceleration: Some(linear_acceleration),
                angular_velocity: Some(angular_velocity),
                heading: Some(rpy.yaw),
                euler_angles: Some(apollo::Point3D::from(&rpy.to_radians())),
                ..Default::default()
            },
        };

        vec![
            TopicMessage::new(&self.imu_topic, BridgeMessage::ApolloImu(imu)),
            TopicMessage::new(
                APOLLO_CORRECTED_IMU_TOPIC,
                BridgeMessage::ApolloCorrectedImu(corrected),
            ),
        ]
    }

    fn encode_ros(
        &self,
        derived: &DerivedState,
        orientation_world: &UnitQuaternion<f64>,
        ctx: &PublicationContext,
        clock: &dyn Clock,
    ) -> Vec<TopicMessage> {
        let orientation = ros::Quaternion::from(orientation_world);

        let imu = ros::Imu {
            header: ros::Header {
                seq: ctx.sequence_number,
                stamp: RosTime::now(clock),
                frame_id: self.imu_frame_id.clone(),
            },
            orientation,
            orientation_covariance: zero_covariance(COVARIANCE_3X3_LEN),
            angular_velocity: ros::Vector3::from(&derived.angular_velocity),
            angular_velocity_covariance: zero_covariance(COVARIANCE_3X3_LEN),
            linear_acceleration: ros::Vector3::from(&derived.linear_acceleration),
            linear_acceleration_covariance: zero_covariance(COVARIANCE_3X3_LEN),
        };

        // Position and twist stay zero: the sensor does not track them.
        let odometry = ros::Odometry {
            header: ros::Header {
                seq: ctx.sequence_number,
                stamp: RosTime::now(clock),
                frame_id: self.odometry_frame_id.clone(),
            },
            child_frame_id: self.odometry_child_frame_id.clone(),
            pose: ros::PoseWithCovariance {
                pose: ros::Pose {
                    position: ros::Point::default(),
                    orientation,
                },
                covariance: zero_covariance(COVARIANCE_6X6_LEN),
            },
            twist: ros::TwistWithCovariance {
                twist: ros::Twist::default(),
                covariance: zero_covariance(COVARIANCE_6X6_LEN),
            },
        };

        vec![
            TopicMessage::new(&self.imu_topic, BridgeMessage::RosImu(imu)),
            TopicMessage::new(&self.odometry_topic, BridgeMessage::RosOdometry(odometry)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deriver::derive;
    use crate::frames::DEG_TO_RAD;
    use crate::time::FixedClock;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    fn sample_state() -> DerivedState {
        derive(
            &Vector3::new(0.0, 0.0, 0.0),
            &Vector3::new(0.1, 0.0, 0.4),
            0.02,
            &Vector3::new(1.0, 2.0, 3.0),
            -9.81,
        )
    }

    fn context(seq: u32) -> PublicationContext {
        PublicationContext {
            measurement_time_seconds: 1_700_000_000.25,
            measurement_span_seconds: 0.02,
            sequence_number: seq,
        }
    }

    fn ros_config() -> ImuSensorConfig {
        ImuSensorConfig {
            imu_topic: "/imu/data".to_string(),
            target_environment: TargetEnvironment::DuckietownRos1,
            ..Default::default()
        }
    }

    #[test]
    fn apollo_emits_imu_and_corrected_imu_with_shared_timestamp() {
        let encoder = SchemaEncoder::new(&ImuSensorConfig::default());
        let clock = FixedClock::from_unix_seconds(0, 0);
        let out = encoder.encode(
            TargetEnvironment::Apollo,
            &sample_state(),
            &UnitQuaternion::identity(),
            &context(0),
            &clock,
        );

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].topic, "/apollo/sensor/gnss/imu");
        assert_eq!(out[1].topic, APOLLO_CORRECTED_IMU_TOPIC);

        let (BridgeMessage::ApolloImu(imu), BridgeMessage::ApolloCorrectedImu(corrected)) =
            (&out[0].message, &out[1].message)
        else {
            panic!("unexpected message types: {:?}", out);
        };

        assert_eq!(imu.header.timestamp_sec, 1_700_000_000.25);
        assert_eq!(imu.measurement_time, 1_700_000_000.25);
        assert_eq!(imu.measurement_span, 0.02);
        assert_eq!(corrected.header, imu.header);

        // Acceleration (5, 0, 20) local -> (20, -5, g); angular (1,2,3) -> (3,-1,2).
        assert_abs_diff_eq!(imu.linear_acceleration.x, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(imu.linear_acceleration.y, -5.0, epsilon = 1e-9);
        assert_eq!(imu.linear_acceleration.z, -9.81);
        assert_eq!(
            imu.angular_velocity,
            apollo::Point3D {
                x: 3.0,
                y: -1.0,
                z: 2.0
            }
        );
        assert_eq!(corrected.imu.linear_acceleration, Some(imu.linear_acceleration));
        assert_eq!(corrected.imu.angular_velocity, Some(imu.angular_velocity));
        assert!(corrected.imu.position.is_none());
        assert!(corrected.imu.orientation.is_none());
    }

    #[test]
    fn apollo_heading_stays_in_degrees_while_euler_angles_are_radians() {
        let encoder = SchemaEncoder::new(&ImuSensorConfig::default());
        // 90 degrees about the engine's vertical axis: yaw = 90.
        let orientation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 90f64.to_radians());
        let out = encoder.encode(
            TargetEnvironment::Apollo,
            &sample_state(),
            &orientation,
            &context(0),
            &FixedClock::from_unix_seconds(0, 0),
        );

        let BridgeMessage::ApolloCorrectedImu(corrected) = &out[1].message else {
            panic!("expected corrected imu, got {:?}", out[1]);
        };
        let heading = corrected.imu.heading.unwrap();
        let euler = corrected.imu.euler_angles.unwrap();

        assert_abs_diff_eq!(heading, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(euler.z, 90.0 * DEG_TO_RAD, epsilon = 1e-9);
        assert_abs_diff_eq!(euler.z, heading * std::f64::consts::PI / 180.0, epsilon = 1e-12);
        assert_abs_diff_eq!(euler.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(euler.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn ros_emits_imu_and_odometry_sharing_sequence() {
        let encoder = SchemaEncoder::new(&ros_config());
        let clock = FixedClock::from_unix_seconds(1_700_000_000, 123);
        let orientation = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.3);
        let out = encoder.encode(
            TargetEnvironment::DuckietownRos1,
            &sample_state(),
            &orientation,
            &context(7),
            &clock,
        );

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].topic, "/imu/data");
        assert_eq!(out[1].topic, "/odometry");

        let (BridgeMessage::RosImu(imu), BridgeMessage::RosOdometry(odom)) =
            (&out[0].message, &out[1].message)
        else {
            panic!("unexpected message types: {:?}", out);
        };

        assert_eq!(imu.header.seq, 7);
        assert_eq!(odom.header.seq, 7);
        assert_eq!(imu.header.frame_id, "/imu");
        assert_eq!(odom.header.frame_id, "/odom");
        assert_eq!(odom.child_frame_id, "/none");
        assert_eq!(
            imu.header.stamp,
            RosTime {
                secs: 1_700_000_000,
                nsecs: 123
            }
        );

        // Orientation is passed through unchanged.
        let expected = ros::Quaternion::from(&orientation);
        assert_eq!(imu.orientation, expected);
        assert_eq!(odom.pose.pose.orientation, expected);

        assert_eq!(imu.angular_velocity, ros::Vector3 { x: 3.0, y: -1.0, z: 2.0 });
        assert_abs_diff_eq!(imu.linear_acceleration.x, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(imu.linear_acceleration.y, -5.0, epsilon = 1e-9);
        assert_eq!(imu.linear_acceleration.z, -9.81);
    }

    #[test]
    fn ros_placeholders_are_zero_regardless_of_motion() {
        let encoder = SchemaEncoder::new(&ros_config());
        let out = encoder.encode(
            TargetEnvironment::DuckietownRos1,
            &sample_state(),
            &UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 1.2),
            &context(0),
            &FixedClock::from_unix_seconds(0, 0),
        );

        let (BridgeMessage::RosImu(imu), BridgeMessage::RosOdometry(odom)) =
            (&out[0].message, &out[1].message)
        else {
            panic!("unexpected message types: {:?}", out);
        };

        for cov in [
            &imu.orientation_covariance,
            &imu.angular_velocity_covariance,
            &imu.linear_acceleration_covariance,
        ] {
            assert_eq!(cov.len(), 9);
            assert!(cov.iter().all(|&c| c == 0.0));
        }
        for cov in [&odom.pose.covariance, &odom.twist.covariance] {
            assert_eq!(cov.len(), 36);
            assert!(cov.iter().all(|&c| c == 0.0));
        }
        assert_eq!(odom.pose.pose.position, ros::Point::default());
        assert_eq!(odom.twist.twist, ros::Twist::default());
    }

    #[test]
    fn environments_without_schema_encode_nothing() {
        let encoder = SchemaEncoder::new(&ImuSensorConfig::default());
        let clock = FixedClock::from_unix_seconds(0, 0);
        for env in [TargetEnvironment::Autoware, TargetEnvironment::DuckietownRos2] {
            let out = encoder.encode(
                env,
                &sample_state(),
                &UnitQuaternion::identity(),
                &context(0),
                &clock,
            );
            assert!(out.is_empty());
            assert!(encoder.publishers(env).is_empty());
        }
    }

    #[test]
    fn publishers_follow_schema() {
        let encoder = SchemaEncoder::new(&ros_config());
        assert_eq!(
            encoder.publishers(TargetEnvironment::DuckietownRos1),
            vec![
                ("/imu/data".to_string(), MessageType::RosImu),
                ("/odometry".to_string(), MessageType::RosOdometry),
            ]
        );
        assert_eq!(
            encoder.publishers(TargetEnvironment::Apollo),
            vec![
                ("/imu/data".to_string(), MessageType::ApolloImu),
                (
                    APOLLO_CORRECTED_IMU_TOPIC.to_string(),
                    MessageType::ApolloCorrectedImu
                ),
            ]
        );
    }

    #[test]
    fn sequence_counter_post_increments() {
        let mut seq = SequenceCounter::default();
        assert_eq!(seq.advance(), 0);
        assert_eq!(seq.advance(), 1);
        assert_eq!(seq.current(), 2);
    }
}
