//! Two-axis mount driver trait
//!
//! This trait abstracts the step/direction/enable lines and the four limit
//! sensors of the mount. Pulse timing is not part of it: the motion
//! controller raises and lowers the step line and waits in between.

use crate::motion::{Axis, Direction};

/// Trait for the stepper hardware of an alt-azimuth mount
pub trait MountDriver {
    /// Set the travel direction for the next pulses on `axis`
    ///
    /// Mounts may share one direction line between both axes, so this is
    /// called again whenever the pulsed axis changes.
    fn set_direction(&mut self, axis: Axis, direction: Direction);

    /// Drive the step line of `axis`
    ///
    /// A step is taken on the rising edge.
    fn set_step(&mut self, axis: Axis, high: bool);

    /// Power both motor drivers on or off
    ///
    /// When disabled, the motors are free to turn and do not hold position.
    fn set_enabled(&mut self, enabled: bool);

    /// Check the limit sensor that bounds travel in `direction` on `axis`
    fn limit_reached(&self, axis: Axis, direction: Direction) -> bool;
}
