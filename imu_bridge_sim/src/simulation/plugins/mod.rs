// imu_bridge_sim/src/simulation/plugins/mod.rs

pub mod body;
pub mod bridge;
pub mod sensors;
