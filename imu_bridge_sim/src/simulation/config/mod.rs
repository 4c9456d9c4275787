// imu_bridge_sim/src/simulation/config/mod.rs

//! Scenario configuration: a TOML file, environment overrides and CLI overrides,
//! merged with figment and validated once at startup.

use bevy::prelude::Resource;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use imu_bridge_core::bridge::TcpBridgeConfig;
use imu_bridge_core::config::ImuSensorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::cli::Cli;

/// Prefix of environment variables overriding scenario values.
/// Nested keys are separated by `__`, e.g. `IMU_BRIDGE_BRIDGE__TCP__ADDRESS`.
pub const ENV_PREFIX: &str = "IMU_BRIDGE_";

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load scenario: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Figment(Box::new(e))
    }
}

// =========================================================================
// == Top-Level Configuration Resource ==
// =========================================================================

/// The root of a `scenario.toml` file.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    #[serde(default)] // Use default if the [simulation] section is missing
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub bridge: BridgeSettings,
    #[serde(default)]
    pub body: BodySettings,
    #[serde(default)]
    pub imu: ImuSettings,
}

// =========================================================================
// == Configuration Sub-Structs ==
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSettings {
    /// Fixed-timestep rate. The IMU samples once per step.
    pub physics_rate_hz: f64,
    /// Stop after this many seconds of simulated time. Runs forever if absent.
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    /// Gravity vector in the Y-up world frame.
    pub gravity: [f32; 3],
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            physics_rate_hz: 50.0,
            duration_seconds: None,
            gravity: [0.0, -9.81, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BridgeMode {
    /// rosbridge over TCP.
    Tcp,
    /// Keep messages in memory and write them to the log.
    #[default]
    Log,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeSettings {
    #[serde(default)]
    pub mode: BridgeMode,
    #[serde(default)]
    pub tcp: TcpBridgeConfig,
}

/// Initial state and constant drive of the simulated body. Bevy axes: Y up, -Z forward.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodySettings {
    #[serde(default)]
    pub position: [f32; 3],
    /// Initial heading about the vertical axis, in degrees.
    #[serde(default)]
    pub yaw_degrees: f32,
    /// Initial linear velocity in the body frame.
    #[serde(default)]
    pub linear_velocity: [f32; 3],
    /// Constant body-frame acceleration applied every step.
    #[serde(default)]
    pub drive_acceleration: [f32; 3],
    /// Constant turn rate about the vertical axis, in degrees per second.
    #[serde(default)]
    pub yaw_rate_degrees: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImuSettings {
    /// Initial operational state of the sensor.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub sensor: ImuSensorConfig,
}

fn default_enabled() -> bool {
    true
}

impl Default for ImuSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            sensor: ImuSensorConfig::default(),
        }
    }
}

// =========================================================================
// == Loading ==
// =========================================================================

impl ScenarioConfig {
    /// The figment every source is layered on: file, then environment.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(ScenarioConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Loads the scenario for a CLI invocation. Command-line overrides win over everything else.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Self::figment(&cli.scenario);

        if let Some(address) = &cli.bridge {
            figment = figment
                .merge(Serialized::default("bridge.mode", BridgeMode::Tcp))
                .merge(Serialized::default("bridge.tcp.address", address));
        }
        if let Some(duration) = cli.duration {
            figment = figment.merge(Serialized::default("simulation.duration_seconds", duration));
        }

        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: ScenarioConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let rate = self.simulation.physics_rate_hz;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "simulation.physics_rate_hz",
                reason: format!("must be a positive number, got {rate}"),
            });
        }
        if let Some(duration) = self.simulation.duration_seconds {
            if !duration.is_finite() || duration < 0.0 {
                return Err(ConfigError::Invalid {
                    field: "simulation.duration_seconds",
                    reason: format!("must be non-negative, got {duration}"),
                });
            }
        }
        if self.simulation.gravity.iter().any(|g| !g.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "simulation.gravity",
                reason: "components must be finite".to_string(),
            });
        }
        if self.bridge.mode == BridgeMode::Tcp && self.bridge.tcp.address.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "bridge.tcp.address",
                reason: "required in Tcp mode".to_string(),
            });
        }
        Ok(())
    }

    /// The fully merged scenario as TOML.
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
