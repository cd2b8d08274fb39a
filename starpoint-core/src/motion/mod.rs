//! Motion control
//!
//! Limit-sensor calibration, straight-line (DDA) moves, axis reversal past
//! zenith, and ramped manual jogging.

pub mod axis;
pub mod controller;
pub mod dda;
pub mod ramp;
pub mod reversal;

mod pulse;

#[cfg(test)]
pub(crate) mod sim;

pub use axis::{Axis, AxisCalibration, Direction, MountCalibration, StepPoint};
pub use controller::{
    CalibrationError, JogOutcome, MotionController, MotionError, MoveMethod, MoveReport,
};
pub use dda::{DdaLine, DdaStep};
pub use ramp::JogRamp;
pub use reversal::{resolve_target, ResolvedTarget};
