// imu_bridge_sim/src/simulation/plugins/bridge.rs

use bevy::prelude::*;
use downcast_rs::{impl_downcast, DowncastSync};
use imu_bridge_core::bridge::{BridgeClient, BridgeError, RecordingBridge, TcpRosBridge};
use imu_bridge_core::types::ConnectionState;

use crate::simulation::config::{BridgeMode, BridgeSettings, ScenarioConfig};
use crate::simulation::core::app_state::SimulationSet;

// =========================================================================
// == Bridge Resource ==
// =========================================================================

/// A bridge that can live in a Bevy resource and be downcast back to its concrete type.
pub trait SimBridge: BridgeClient + DowncastSync {
    fn as_client(&mut self) -> &mut dyn BridgeClient;
}
impl_downcast!(sync SimBridge);

impl<T: BridgeClient + Send + Sync + 'static> SimBridge for T {
    fn as_client(&mut self) -> &mut dyn BridgeClient {
        self
    }
}

/// The one pub/sub endpoint every sensor in the scene publishes through.
#[derive(Resource)]
pub struct BridgeConnection(pub Box<dyn SimBridge>);

impl BridgeConnection {
    pub fn from_settings(settings: &BridgeSettings) -> Result<Self, BridgeError> {
        match settings.mode {
            BridgeMode::Tcp => Ok(Self(Box::new(TcpRosBridge::spawn(settings.tcp.clone())?))),
            BridgeMode::Log => Ok(Self::recording()),
        }
    }

    /// An always-connected in-memory bridge.
    pub fn recording() -> Self {
        Self(Box::new(RecordingBridge::connected()))
    }

    pub fn client(&mut self) -> &mut dyn BridgeClient {
        self.0.as_client()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.0.connection_state()
    }

    pub fn as_recording(&self) -> Option<&RecordingBridge> {
        self.0.downcast_ref::<RecordingBridge>()
    }

    pub fn as_recording_mut(&mut self) -> Option<&mut RecordingBridge> {
        self.0.downcast_mut::<RecordingBridge>()
    }
}

// =========================================================================
// == Plugin ==
// =========================================================================

pub struct BridgePlugin;

impl Plugin for BridgePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<BridgeConnection>() {
            let settings = app
                .world()
                .get_resource::<ScenarioConfig>()
                .map(|config| config.bridge.clone())
                .unwrap_or_default();

            let connection = match BridgeConnection::from_settings(&settings) {
                Ok(connection) => {
                    info!("Bridge mode: {:?}", settings.mode);
                    connection
                }
                Err(e) => {
                    // The IMU stays gated behind a disconnected bridge.
                    error!("Failed to start {:?} bridge: {}", settings.mode, e);
                    BridgeConnection(Box::new(RecordingBridge::new()))
                }
            };
            app.insert_resource(connection);
        }

        app.add_systems(Update, report_connection_changes).add_systems(
            FixedUpdate,
            log_recorded_messages.in_set(SimulationSet::Output),
        );
    }
}

// =========================================================================
// == Systems ==
// =========================================================================

fn report_connection_changes(
    bridge: Res<BridgeConnection>,
    mut last: Local<Option<ConnectionState>>,
) {
    let state = bridge.connection_state();
    if *last != Some(state) {
        info!("Bridge is now {:?}", state);
        *last = Some(state);
    }
}

/// In `Log` mode, writes every published message to the log and forgets it.
pub fn log_recorded_messages(mut bridge: ResMut<BridgeConnection>) {
    let Some(recording) = bridge.as_recording_mut() else {
        return;
    };
    for out in recording.drain() {
        match serde_json::to_string(&out.message) {
            Ok(json) => info!("[{}] {}", out.topic, json),
            Err(e) => warn!("Could not serialize message for '{}': {}", out.topic, e),
        }
    }
}
