//! Mount drivers

pub mod gpio;

pub use gpio::{GpioMount, MountPinSet};
