// imu_bridge_sim/src/lib.rs

use bevy::prelude::*;

// Import the plugins defined within the simulation crate.
use crate::simulation::core::simulation_setup::SimulationSetupPlugin;
use crate::simulation::plugins::body::BodyPlugin;
use crate::simulation::plugins::bridge::BridgePlugin;
use crate::simulation::plugins::sensors::imu::ImuPlugin;

// This prelude is for convenience for other files WITHIN the imu_bridge_sim crate.
pub mod prelude;

pub mod cli;
pub mod simulation;

/// The main plugin that brings together all the simulation parts.
/// Expects a `ScenarioConfig` resource to be inserted first.
pub struct ImuBridgeSimulationPlugin;

impl Plugin for ImuBridgeSimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            // Fixed timestep, gravity, schedule ordering, run duration.
            SimulationSetupPlugin,
            // The pub/sub endpoint.
            BridgePlugin,
            // The moving rigid body.
            BodyPlugin,
            // The sensor itself.
            ImuPlugin,
        ));
    }
}
