// imu_bridge_sim/src/prelude.rs

// Re-export the entire Bevy prelude for convenience.
pub use bevy::prelude::*;

// Re-export the imu_bridge_core prelude so pure types like `ImuSensor`,
// `BridgeClient` and `TargetEnvironment` are at hand.
pub use imu_bridge_core::prelude::*;

// Re-export common simulation-specific types for easy access in other plugins.
pub use crate::simulation::config::{BridgeMode, ScenarioConfig};
pub use crate::simulation::core::app_state::{AppState, SceneBuildSet, SimulationSet};
pub use crate::simulation::plugins::bridge::BridgeConnection;
pub use crate::simulation::plugins::sensors::imu::{ImuPlugin, SetImuEnabled};
