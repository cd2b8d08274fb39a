//! Adapters from `embedded-hal` 1.0 peripherals
//!
//! Chip HALs (embassy, rp2040-hal, stm32 HALs) expose `embedded-hal`
//! traits. These wrappers turn their infallible GPIO and delay types into
//! the traits of this crate.

use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital;

use crate::delay::Delay;
use crate::gpio::{InputPin, OutputPin};

/// Output pin backed by an `embedded-hal` output
///
/// The last written level is cached so `is_set_high` works for outputs that
/// do not implement `StatefulOutputPin`.
pub struct EhOutput<P> {
    pin: P,
    high: bool,
}

impl<P: digital::OutputPin<Error = Infallible>> EhOutput<P> {
    /// Wrap a pin, driving it low
    pub fn new(mut pin: P) -> Self {
        match pin.set_low() {
            Ok(()) => {}
            Err(e) => match e {},
        }
        Self { pin, high: false }
    }

    /// Give back the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: digital::OutputPin<Error = Infallible>> OutputPin for EhOutput<P> {
    fn set_high(&mut self) {
        match self.pin.set_high() {
            Ok(()) => self.high = true,
            Err(e) => match e {},
        }
    }

    fn set_low(&mut self) {
        match self.pin.set_low() {
            Ok(()) => self.high = false,
            Err(e) => match e {},
        }
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Input pin backed by an `embedded-hal` input
///
/// `embedded-hal` reads take `&mut self`; the pin sits in a `RefCell` so
/// sensor reads can stay `&self`.
pub struct EhInput<P> {
    pin: RefCell<P>,
}

impl<P: digital::InputPin<Error = Infallible>> EhInput<P> {
    /// Wrap an input pin
    pub fn new(pin: P) -> Self {
        Self {
            pin: RefCell::new(pin),
        }
    }

    /// Give back the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin.into_inner()
    }
}

impl<P: digital::InputPin<Error = Infallible>> InputPin for EhInput<P> {
    fn is_high(&self) -> bool {
        match self.pin.borrow_mut().is_high() {
            Ok(level) => level,
            Err(e) => match e {},
        }
    }
}

/// Delay backed by an `embedded-hal` delay provider
pub struct EhDelay<D>(pub D);

impl<D: DelayNs> Delay for EhDelay<D> {
    fn delay_ms(&mut self, ms: u32) {
        self.0.delay_ms(ms);
    }

    fn delay_us(&mut self, us: u32) {
        self.0.delay_us(us);
    }
}
