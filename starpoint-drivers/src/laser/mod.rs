//! Pointing laser drivers

pub mod gpio;

pub use gpio::GpioLaser;
