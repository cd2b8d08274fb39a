//! GPIO mount driver
//!
//! Drives two step/direction stepper drivers that share one direction line
//! and reads the four limit sensors. Every line's active level comes from
//! the [`MountPins`] configuration.

use starpoint_core::config::{MountPins, PinConfig};
use starpoint_core::motion::{Axis, Direction};
use starpoint_core::traits::MountDriver;
use starpoint_hal::{InputPin, OutputPin};

/// Pins of the mount, already configured as outputs and inputs
pub struct MountPinSet<O, I> {
    pub step_azimuth: O,
    pub step_altitude: O,
    pub direction: O,
    pub enable_azimuth: O,
    pub enable_altitude: O,
    pub azimuth_zero: I,
    pub azimuth_full: I,
    pub altitude_bottom: I,
    pub altitude_top: I,
}

/// Mount driver on plain GPIO pins
pub struct GpioMount<O, I> {
    pins: MountPinSet<O, I>,
    config: MountPins,
    enabled: bool,
}

impl<O: OutputPin, I: InputPin> GpioMount<O, I> {
    /// Create the driver with step lines idle and motors disabled
    pub fn new(pins: MountPinSet<O, I>, config: MountPins) -> Self {
        let mut mount = Self {
            pins,
            config,
            enabled: false,
        };
        mount.set_step(Axis::Azimuth, false);
        mount.set_step(Axis::Altitude, false);
        mount.set_enabled(false);
        mount
    }

    /// Whether the motor drivers are powered
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Release the pins
    pub fn release(self) -> MountPinSet<O, I> {
        self.pins
    }

    fn sensor(&self, axis: Axis, direction: Direction) -> (&I, PinConfig) {
        let pins = &self.pins;
        let config = &self.config;
        match (axis, direction) {
            (Axis::Azimuth, Direction::Negative) => (&pins.azimuth_zero, config.azimuth_zero),
            (Axis::Azimuth, Direction::Positive) => (&pins.azimuth_full, config.azimuth_full),
            (Axis::Altitude, Direction::Negative) => {
                (&pins.altitude_bottom, config.altitude_bottom)
            }
            (Axis::Altitude, Direction::Positive) => (&pins.altitude_top, config.altitude_top),
        }
    }
}

impl<O: OutputPin, I: InputPin> MountDriver for GpioMount<O, I> {
    fn set_direction(&mut self, axis: Axis, direction: Direction) {
        let mut positive = direction == Direction::Positive;
        if axis == Axis::Altitude && self.config.altitude_direction_flipped {
            positive = !positive;
        }
        self.pins
            .direction
            .set_state(self.config.direction.level_for(positive));
    }

    fn set_step(&mut self, axis: Axis, high: bool) {
        match axis {
            Axis::Azimuth => self
                .pins
                .step_azimuth
                .set_state(self.config.step_azimuth.level_for(high)),
            Axis::Altitude => self
                .pins
                .step_altitude
                .set_state(self.config.step_altitude.level_for(high)),
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.pins
            .enable_azimuth
            .set_state(self.config.enable_azimuth.level_for(enabled));
        self.pins
            .enable_altitude
            .set_state(self.config.enable_altitude.level_for(enabled));
        self.enabled = enabled;
    }

    fn limit_reached(&self, axis: Axis, direction: Direction) -> bool {
        let (pin, config) = self.sensor(axis, direction);
        config.is_active(pin.is_high())
    }
}
