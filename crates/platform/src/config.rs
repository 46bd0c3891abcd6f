//! Driver identity and fixed configuration
//!
//! Naming and the single supported timing profile live here so the
//! controller, the dispatch layer and the host tool agree on them.

use crate::tcs34725::{ATIME_700MS, INTEGRATION_WAIT_MS, POWER_ON_SETTLE_MS, TCS34725_I2C_ADDR};

/// Driver name as registered with the bus.
pub const DRIVER_NAME: &str = "tcs34725_driver";

/// Device node name (`/dev/tcs34725`).
pub const DEVICE_NAME: &str = "tcs34725";

/// Device class name.
pub const CLASS_NAME: &str = "tcs34725";

/// Device-tree compatible string.
pub const OF_COMPATIBLE: &str = "taos,tcs34725";

/// I2C device id.
pub const I2C_DEVICE_ID: &str = "tcs34725";

/// Driver version (synchronized with Cargo.toml)
pub const DRIVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default I2C address used when none is configured.
pub const DEFAULT_I2C_ADDR: u8 = TCS34725_I2C_ADDR;

/// Power-up sequence parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitProfile {
    /// Value written to ATIME.
    pub atime: u8,
    /// Wait between PON and PON|AEN, in milliseconds.
    pub settle_ms: u32,
    /// Wait after PON|AEN before the first valid result, in milliseconds.
    pub integration_ms: u32,
}

impl InitProfile {
    /// Total blocking time of the power-up sequence.
    #[must_use]
    pub const fn total_wait_ms(&self) -> u32 {
        self.settle_ms.saturating_add(self.integration_ms)
    }
}

/// The one supported profile: 700 ms integration, high sensitivity.
pub const INIT_PROFILE: InitProfile = InitProfile {
    atime: ATIME_700MS,
    settle_ms: POWER_ON_SETTLE_MS,
    integration_ms: INTEGRATION_WAIT_MS,
};

impl Default for InitProfile {
    fn default() -> Self {
        INIT_PROFILE
    }
}
