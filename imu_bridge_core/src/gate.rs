// imu_bridge_core/src/gate.rs

use crate::types::{ConnectionState, SensorState};

/// Decides whether a tick may publish. Checked before any derivation or encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishGate;

impl PublishGate {
    /// True iff the bridge is connected AND publishing is enabled AND the sensor is enabled.
    pub fn should_publish(
        connection: ConnectionState,
        publishing_enabled: bool,
        sensor_enabled: bool,
    ) -> bool {
        connection.is_connected() && publishing_enabled && sensor_enabled
    }

    pub fn allows(connection: ConnectionState, publishing_enabled: bool, state: SensorState) -> bool {
        Self::should_publish(connection, publishing_enabled, state == SensorState::Enabled)
    }
}
