//! Hardware configuration types
//!
//! Pin assignments for the step, direction and enable lines, the four
//! limit sensors, and the optional pointing laser.

use serde::{Deserialize, Serialize};

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create a pin with pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: true,
        }
    }

    /// Physical level that represents the logical `active` state
    pub const fn level_for(&self, active: bool) -> bool {
        active != self.inverted
    }

    /// Logical state represented by a physical `level`
    pub const fn is_active(&self, level: bool) -> bool {
        level != self.inverted
    }
}

/// Pin assignments for the mount
///
/// The direction line is shared by both motor drivers. Its inversion flag
/// applies to the azimuth axis; `altitude_direction_flipped` additionally
/// reverses it while the altitude axis is being stepped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MountPins {
    /// Azimuth step pulse pin
    pub step_azimuth: PinConfig,
    /// Altitude step pulse pin
    pub step_altitude: PinConfig,
    /// Shared direction pin
    pub direction: PinConfig,
    /// Altitude motor turns opposite to azimuth for the same direction level
    pub altitude_direction_flipped: bool,
    /// Azimuth driver enable (active-low typically)
    pub enable_azimuth: PinConfig,
    /// Altitude driver enable (active-low typically)
    pub enable_altitude: PinConfig,
    /// Azimuth 0° limit sensor
    pub azimuth_zero: PinConfig,
    /// Azimuth 360° limit sensor
    pub azimuth_full: PinConfig,
    /// Altitude horizon limit sensor
    pub altitude_bottom: PinConfig,
    /// Altitude zenith limit sensor
    pub altitude_top: PinConfig,
    /// Pointing laser, if fitted
    pub laser: Option<PinConfig>,
}

impl Default for MountPins {
    fn default() -> Self {
        Self {
            step_azimuth: PinConfig::new(2),
            step_altitude: PinConfig::new(3),
            direction: PinConfig::inverted(4),
            altitude_direction_flipped: true,
            enable_azimuth: PinConfig::inverted(5),
            enable_altitude: PinConfig::inverted(6),
            // Azimuth sensors read high when tripped, altitude sensors low
            azimuth_zero: PinConfig::new(7),
            azimuth_full: PinConfig::new(8),
            altitude_bottom: PinConfig::inverted(9),
            altitude_top: PinConfig::inverted(10),
            laser: Some(PinConfig::new(11)),
        }
    }
}
