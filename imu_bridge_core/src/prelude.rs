// imu_bridge_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::bridge::{BridgeClient, BridgeError, PublisherRegistry};
pub use crate::sensor::{ImuSensor, MotionSource, TickOutcome};
pub use crate::time::{Clock, FixedClock, SystemClock};

// --- Core Data Structures ---
pub use crate::config::{ImuSensorConfig, APOLLO_CORRECTED_IMU_TOPIC};
pub use crate::messages::{BridgeMessage, MessageType, TopicMessage};
pub use crate::types::{
    ConnectionState, DerivedState, MotionSample, Schema, SensorState, TargetEnvironment,
};

// --- Concrete Bridges ---
pub use crate::bridge::{RecordingBridge, TcpBridgeConfig, TcpRosBridge};
