//! Motion, jog and coordinate configuration

use serde::{Deserialize, Serialize};

use super::hardware::MountPins;

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Ratio of sidereal to solar time
pub const SIDEREAL_RATE: f64 = 1.002737908;

/// Step pulse and settling timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionTiming {
    /// Time the step line is held high, and then low, per pulse
    pub pulse_half_period_us: u32,
    /// Pause before each single-axis run so the mount settles
    pub settle_ms: u32,
    /// Pulses allowed while probing for a limit sensor
    pub probe_step_cap: u32,
}

impl Default for MotionTiming {
    fn default() -> Self {
        Self {
            pulse_half_period_us: 1200,
            settle_ms: 50,
            probe_step_cap: 10_000,
        }
    }
}

/// Manual jog speed ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JogConfig {
    /// Initial pulse half-period
    pub start_half_period_us: u32,
    /// Fastest pulse half-period
    pub floor_half_period_us: u32,
    /// Half-period reduction per ramp increment
    pub decrement_us: u32,
    /// Steps between ramp increments (0 disables ramping)
    pub steps_per_increment: u32,
}

impl Default for JogConfig {
    fn default() -> Self {
        Self {
            start_half_period_us: 7100,
            floor_half_period_us: 1100,
            decrement_us: 1000,
            steps_per_increment: 50,
        }
    }
}

/// Motion controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionConfig {
    /// Pulse timing
    pub timing: MotionTiming,
    /// Jog ramp
    pub jog: JogConfig,
    /// Step count increases with decreasing azimuth
    pub azimuth_inverted: bool,
}

/// Coordinate transformer configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoordsConfig {
    /// Sidereal correction constant
    pub sidereal_rate: f64,
}

impl Default for CoordsConfig {
    fn default() -> Self {
        Self {
            sidereal_rate: SIDEREAL_RATE,
        }
    }
}

/// Complete mount configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MountConfig {
    /// Configuration version for compatibility checks
    pub version: u8,
    /// Pin assignments
    pub pins: MountPins,
    /// Motion settings
    pub motion: MotionConfig,
    /// Coordinate settings
    pub coords: CoordsConfig,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MountConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            pins: MountPins::default(),
            motion: MotionConfig::default(),
            coords: CoordsConfig::default(),
        }
    }
}
