// imu_bridge_sim/src/main.rs

//! Headless IMU simulation.
//!
//! Loads a scenario, spawns a kinematic body carrying an IMU and publishes the
//! sensor's readings through the configured bridge once per physics step.
//!
//! `cargo run -p imu_bridge_sim -- --scenario assets/scenarios/ros1_imu.toml --bridge 127.0.0.1:9090`

use std::time::Duration;

// --- Bevy Imports ---
use avian3d::prelude::*;
use bevy::{
    app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*, scene::ScenePlugin,
    state::app::StatesPlugin,
};
use clap::Parser;

// --- Project-Specific Imports ---
use imu_bridge_sim::cli::Cli;
use imu_bridge_sim::prelude::AppState;
use imu_bridge_sim::simulation::config::ScenarioConfig;
use imu_bridge_sim::ImuBridgeSimulationPlugin;

fn main() -> AppExit {
    // --- 1. Load Simulation Configuration ---
    let cli = Cli::parse();
    let config = match ScenarioConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Could not load scenario '{}': {}", cli.scenario.display(), e);
            return AppExit::error();
        }
    };

    if cli.print_config {
        return match config.to_toml() {
            Ok(toml) => {
                println!("{toml}");
                AppExit::Success
            }
            Err(e) => {
                eprintln!("Could not serialize scenario: {e}");
                AppExit::error()
            }
        };
    }

    let step = Duration::from_secs_f64(1.0 / config.simulation.physics_rate_hz);
    let mut app = App::new();

    // --- 2. Add Core Bevy Plugins & Resources ---
    app.add_plugins((
        // No window: the main loop runs on a timer at the physics rate.
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(step)),
        LogPlugin {
            level: bevy::log::Level::INFO,
            filter: "info,imu_bridge_sim=debug,imu_bridge_core=debug".to_string(),
            ..default()
        },
        StatesPlugin,
        TransformPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ))
    // avian's collider constructors expect mesh assets to exist.
    .init_asset::<Mesh>()
    // The Avian3D physics plugins.
    .add_plugins(PhysicsPlugins::default())
    // Insert the loaded configuration as a Bevy resource so all systems can access it.
    .insert_resource(config)
    .insert_resource(cli);

    app.init_state::<AppState>();

    // --- 3. Add the Main Simulation Plugin ---
    app.add_plugins(ImuBridgeSimulationPlugin);

    // --- 4. Run the App ---
    info!("Starting IMU bridge simulation...");
    app.run()
}
