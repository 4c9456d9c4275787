// imu_bridge_core/src/lib.rs

// Framework-agnostic IMU sampling and publication pipeline.
pub mod bridge;
pub mod config;
pub mod deriver;
pub mod encoder;
pub mod frames;
pub mod gate;
pub mod messages;
pub mod prelude;
pub mod sensor;
pub mod time;
pub mod types;
