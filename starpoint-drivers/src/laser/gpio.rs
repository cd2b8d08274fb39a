//! GPIO laser output
//!
//! Switches the pointing laser module through a GPIO pin (directly or via
//! a transistor).

use starpoint_core::config::PinConfig;
use starpoint_core::traits::LaserOutput;
use starpoint_hal::OutputPin;

/// GPIO laser output
///
/// The pin can be configured as active-high (default) or active-low.
pub struct GpioLaser<P> {
    pin: P,
    /// If true, laser ON = pin LOW
    inverted: bool,
    on: bool,
}

impl<P: OutputPin> GpioLaser<P> {
    /// Create a new laser output, initially off
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut laser = Self {
            pin,
            inverted,
            on: false,
        };
        laser.set_on(false);
        laser
    }

    /// Create a laser output using the polarity from configuration
    pub fn from_config(pin: P, config: &PinConfig) -> Self {
        Self::new(pin, config.inverted)
    }

    /// Release the pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> LaserOutput for GpioLaser<P> {
    fn set_on(&mut self, on: bool) {
        self.on = on;
        self.pin.set_state(on != self.inverted);
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
