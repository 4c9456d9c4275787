// imu_bridge_sim/src/simulation/plugins/sensors/mod.rs

pub mod imu;
