// imu_bridge_sim/src/cli.rs

use bevy::prelude::Resource;
use clap::Parser;
use std::path::PathBuf;

/// Simulated IMU publishing its readings over rosbridge.
///
/// Scenario values can also be overridden through `IMU_BRIDGE_*` environment
/// variables (nested keys separated by `__`).
#[derive(Parser, Debug, Resource, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/apollo_imu.toml")]
    pub scenario: PathBuf,

    /// Publish to a rosbridge server at this `host:port` (forces the Tcp bridge).
    #[arg(short, long)]
    pub bridge: Option<String>,

    /// Stop after this many seconds of simulated time.
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Print the merged scenario as TOML and exit.
    #[arg(long, default_value_t = false)]
    pub print_config: bool,
}
