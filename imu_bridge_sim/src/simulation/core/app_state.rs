// imu_bridge_sim/src/simulation/core/app_state.rs

use bevy::{ecs::schedule::SystemSet, prelude::States};

/// Defines the major phases of the application's lifecycle.
#[derive(States, Debug, Clone, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// The initial state. The scene is spawned from the config here.
    #[default]
    Loading,

    /// The scene is built. The fixed-step loop drives the body and the sensor.
    Running,

    /// The configured duration has elapsed. The app exits.
    Finished,
}

/// System sets ordering the scene construction in `OnEnter(AppState::Loading)`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SceneBuildSet {
    /// Pass 1: Spawn the rigid body.
    Body,
    /// Pass 2: Attach sensors to the body.
    Sensors,
    /// Pass 3: Move on to `Running`.
    Finalize,
}

// =========================================================================
// == Main Simulation Sets ==
// =========================================================================

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Systems that change the body's velocity. Runs first.
    Actuation,
    /// Systems that sample the body (the IMU). Runs after actuation.
    Sensors,
    /// Systems that consume what the sensors produced.
    Output,
}
