// imu_bridge_core/src/sensor.rs

//! The per-tick orchestrator.
//!
//! An [`ImuSensor`] is driven by an external fixed-rate loop. Each call to
//! [`ImuSensor::tick`] pulls one sample from a [`MotionSource`], checks the
//! [`PublishGate`], derives the sensor-frame state, encodes it for the
//! configured environment and hands the messages to a [`BridgeClient`].

use nalgebra::{UnitQuaternion, Vector3};
use tracing::{debug, info, warn};

use crate::bridge::BridgeClient;
use crate::config::ImuSensorConfig;
use crate::deriver::{SampleDeriver, SkipReason};
use crate::encoder::{PublicationContext, SchemaEncoder, SequenceCounter};
use crate::gate::PublishGate;
use crate::time::{unix_seconds, Clock, SystemClock};
use crate::types::{ConnectionState, MotionSample, Schema, SensorState};

// =========================================================================
// == Motion Source ==
// =========================================================================

/// Whatever moves the sensor. Queried once per tick.
pub trait MotionSource {
    /// Linear velocity in the body's local frame.
    fn linear_velocity(&self) -> Vector3<f64>;
    /// Angular velocity in the world frame.
    fn angular_velocity(&self) -> Vector3<f64>;
    /// World-frame orientation of the body.
    fn orientation(&self) -> UnitQuaternion<f64>;
    /// Duration of the current fixed step, in seconds.
    fn tick_delta_seconds(&self) -> f32;
    /// Vertical component of gravity (negative when pointing down).
    fn gravity(&self) -> f32;

    fn sample(&self) -> MotionSample {
        MotionSample {
            linear_velocity_local: self.linear_velocity(),
            angular_velocity_world: self.angular_velocity(),
            orientation_world: self.orientation(),
            dt: self.tick_delta_seconds() as f64,
            gravity_y: self.gravity() as f64,
        }
    }
}

impl MotionSource for MotionSample {
    fn linear_velocity(&self) -> Vector3<f64> {
        self.linear_velocity_local
    }
    fn angular_velocity(&self) -> Vector3<f64> {
        self.angular_velocity_world
    }
    fn orientation(&self) -> UnitQuaternion<f64> {
        self.orientation_world
    }
    fn tick_delta_seconds(&self) -> f32 {
        self.dt as f32
    }
    fn gravity(&self) -> f32 {
        self.gravity_y as f32
    }

    fn sample(&self) -> MotionSample {
        *self
    }
}

// =========================================================================
// == Sensor ==
// =========================================================================

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The gate was closed. The velocity was recorded, nothing else happened.
    Gated,
    /// The gate was open but there was nothing to derive from.
    Skipped(SkipReason),
    /// Messages were handed to the bridge. `messages` counts the ones it accepted.
    Published { messages: usize },
}

/// A simulated IMU publishing through a bridge.
///
/// Owns the previous velocity and the header sequence for its whole lifetime.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "bevy", derive(bevy_ecs::prelude::Component))]
pub struct ImuSensor {
    config: ImuSensorConfig,
    encoder: SchemaEncoder,
    deriver: SampleDeriver,
    sequence: SequenceCounter,
    state: SensorState,
    last_connection: ConnectionState,
    clock: Box<dyn Clock>,
}

impl ImuSensor {
    pub fn new(config: ImuSensorConfig) -> Self {
        Self {
            encoder: SchemaEncoder::new(&config),
            config,
            deriver: SampleDeriver::new(),
            sequence: SequenceCounter::default(),
            state: SensorState::Disabled,
            last_connection: ConnectionState::Disconnected,
            clock: Box::new(SystemClock),
        }
    }

    /// Replaces the wall clock used for message timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> SensorState {
        self.state
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        let state = SensorState::from(enabled);
        if state != self.state {
            debug!("IMU sensor {:?} -> {:?}", self.state, state);
        }
        self.state = state;
    }

    /// The sequence number the next ROS messages will carry.
    pub fn next_sequence(&self) -> u32 {
        self.sequence.current()
    }

    pub fn previous_velocity(&self) -> Option<&Vector3<f64>> {
        self.deriver.previous_velocity()
    }

    /// Registers this sensor's publishers with `bridge`. Failures are logged, not returned.
    pub fn register_publishers(&self, bridge: &mut dyn BridgeClient) {
        let env = self.config.target_environment;
        for (topic, message_type) in self.encoder.publishers(env) {
            match bridge.register_publisher(&topic, message_type) {
                Ok(()) => debug!("Registered '{}' as {}", topic, message_type.type_name()),
                Err(e) => warn!("Failed to register publisher on '{}': {}", topic, e),
            }
        }
    }

    /// Reads the bridge state and registers publishers on a Disconnected -> Connected edge.
    fn sync_connection(&mut self, bridge: &mut dyn BridgeClient) -> ConnectionState {
        let connection = bridge.connection_state();
        if connection.is_connected() && !self.last_connection.is_connected() {
            info!(
                "Bridge connected, registering {:?} publishers",
                self.config.target_environment
            );
            self.register_publishers(bridge);
        }
        self.last_connection = connection;
        connection
    }

    /// Runs one sampling step.
    pub fn tick(&mut self, source: &dyn MotionSource, bridge: &mut dyn BridgeClient) -> TickOutcome {
        // --- 1. Connection bookkeeping ---
        let connection = self.sync_connection(bridge);

        // --- 2. Sample ---
        let sample = source.sample();

        // --- 3. Gate ---
        if !PublishGate::allows(connection, self.config.publish_messages, self.state) {
            // Keep tracking so acceleration is continuous once publishing resumes.
            self.deriver.observe(sample.linear_velocity_local);
            return TickOutcome::Gated;
        }

        // --- 4. Schema ---
        let env = self.config.target_environment;
        let Some(schema) = env.schema() else {
            // No message set for this environment: nothing to derive or encode.
            self.deriver.observe(sample.linear_velocity_local);
            return TickOutcome::Published { messages: 0 };
        };

        // --- 5. Derive ---
        let derived = match self.deriver.sample(
            sample.linear_velocity_local,
            sample.dt,
            &sample.angular_velocity_world,
            sample.gravity_y,
        ) {
            Ok(derived) => derived,
            Err(reason) => {
                debug!("IMU tick skipped: {:?}", reason);
                return TickOutcome::Skipped(reason);
            }
        };

        // --- 6. Timestamp & sequence ---
        let sequence_number = if schema == Schema::Ros {
            self.sequence.advance()
        } else {
            self.sequence.current()
        };
        let ctx = PublicationContext {
            measurement_time_seconds: unix_seconds(self.clock.now()),
            measurement_span_seconds: sample.dt as f32,
            sequence_number,
        };

        // --- 7. Encode & dispatch ---
        let outgoing = self.encoder.encode(
            env,
            &derived,
            &sample.orientation_world,
            &ctx,
            self.clock.as_ref(),
        );

        let mut messages = 0;
        for out in &outgoing {
            match bridge.publish(&out.topic, &out.message) {
                Ok(()) => messages += 1,
                Err(e) => warn!("Failed to publish on '{}': {}", out.topic, e),
            }
        }

        TickOutcome::Published { messages }
    }
}
