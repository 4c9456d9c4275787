// imu_bridge_core/src/time.rs

//! Wall-clock timestamps for outgoing messages.
//!
//! Every conversion takes the instant explicitly, so nothing here reads
//! process-wide state except [`SystemClock`].

use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Unix-epoch seconds, the `measurement_time` / `timestamp_sec` of the Apollo schema.
/// Instants before the Unix epoch are clamped to it.
pub fn unix_seconds(now: SystemTime) -> f64 {
    now.duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs_f64()
}

// =========================================================================
// == Clock Abstraction ==
// =========================================================================

/// A source of "now". Swapped for a fixed clock in tests.
pub trait Clock: DynClone + Debug + Send + Sync {
    fn now(&self) -> SystemTime;
}

dyn_clone::clone_trait_object!(Clock);

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub SystemTime);

impl FixedClock {
    pub fn from_unix_seconds(secs: u64, nanos: u32) -> Self {
        Self(UNIX_EPOCH + Duration::new(secs, nanos))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        self.0
    }
}

// =========================================================================
// == ROS Time ==
// =========================================================================

/// `time` primitive of the ROS schema: whole seconds plus nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosTime {
    pub secs: u32,
    pub nsecs: u32,
}

impl RosTime {
    pub fn from_system_time(now: SystemTime) -> Self {
        let since_unix = now.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        Self {
            // ROS1 `time` is 32-bit; saturate rather than wrap past 2106.
            secs: u32::try_from(since_unix.as_secs()).unwrap_or(u32::MAX),
            nsecs: since_unix.subsec_nanos(),
        }
    }

    pub fn now(clock: &dyn Clock) -> Self {
        Self::from_system_time(clock.now())
    }
}
