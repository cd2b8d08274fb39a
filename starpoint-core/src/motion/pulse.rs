//! Step pulse generation
//!
//! Motor power is held by a guard for the duration of every motion
//! operation and released when the guard drops, including on early return.

use core::ops::{Deref, DerefMut};

use starpoint_hal::Delay;

use super::axis::{Axis, Direction};
use crate::config::MotionTiming;
use crate::traits::MountDriver;

/// Motor power held for the lifetime of the guard
pub(crate) struct Powered<'a, M: MountDriver> {
    mount: &'a mut M,
}

impl<'a, M: MountDriver> Powered<'a, M> {
    pub(crate) fn new(mount: &'a mut M) -> Self {
        mount.set_enabled(true);
        Self { mount }
    }
}

impl<M: MountDriver> Drop for Powered<'_, M> {
    fn drop(&mut self) {
        self.mount.set_enabled(false);
    }
}

impl<M: MountDriver> Deref for Powered<'_, M> {
    type Target = M;

    fn deref(&self) -> &M {
        self.mount
    }
}

impl<M: MountDriver> DerefMut for Powered<'_, M> {
    fn deref_mut(&mut self) -> &mut M {
        self.mount
    }
}

/// Result of a single-axis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Run {
    /// Pulses issued
    pub taken: u32,
    /// Stopped because the limit sensor tripped
    pub limit_reached: bool,
}

/// Pulse generator over a powered mount
pub(crate) struct Pulser<'a, M: MountDriver, D: Delay> {
    mount: Powered<'a, M>,
    delay: &'a mut D,
    timing: MotionTiming,
}

impl<'a, M: MountDriver, D: Delay> Pulser<'a, M, D> {
    /// Power the motors and prepare to pulse
    pub(crate) fn new(mount: &'a mut M, delay: &'a mut D, timing: MotionTiming) -> Self {
        Self {
            mount: Powered::new(mount),
            delay,
            timing,
        }
    }

    pub(crate) fn set_direction(&mut self, axis: Axis, direction: Direction) {
        self.mount.set_direction(axis, direction);
    }

    pub(crate) fn limit_reached(&self, axis: Axis, direction: Direction) -> bool {
        self.mount.limit_reached(axis, direction)
    }

    /// Emit one step pulse with the given half-period
    pub(crate) fn pulse(&mut self, axis: Axis, half_period_us: u32) {
        self.mount.set_step(axis, true);
        self.delay.delay_us(half_period_us);
        self.mount.set_step(axis, false);
        self.delay.delay_us(half_period_us);
    }

    /// Step `axis` up to `steps` times at the standard rate
    ///
    /// Stops after the pulse on which the sensor bounding `direction` reads
    /// tripped. With `settle`, waits for the mount to settle after setting
    /// the direction.
    pub(crate) fn run(&mut self, axis: Axis, direction: Direction, steps: u32, settle: bool) -> Run {
        self.set_direction(axis, direction);
        if settle && self.timing.settle_ms > 0 {
            self.delay.delay_ms(self.timing.settle_ms);
        }

        let half_period = self.timing.pulse_half_period_us;
        let mut taken = 0;
        while taken < steps {
            self.pulse(axis, half_period);
            taken += 1;
            if self.limit_reached(axis, direction) {
                return Run {
                    taken,
                    limit_reached: true,
                };
            }
        }

        Run {
            taken,
            limit_reached: false,
        }
    }
}
