//! Simulated mount for host tests
//!
//! Models each axis as a step counter between two hard stops with a limit
//! sensor at each stop. Pulses into a hard stop are lost, as on the real
//! mechanism.

use starpoint_hal::Delay;

use super::axis::{Axis, Direction};
use crate::traits::MountDriver;

/// Simulated axis
#[derive(Debug, Clone, Copy)]
struct SimAxis {
    position: i32,
    upper_stop: i32,
    lower_sensor: bool,
    upper_sensor: bool,
    direction: Direction,
    step_high: bool,
    pulses: u32,
}

impl SimAxis {
    fn new(upper_stop: i32) -> Self {
        Self {
            position: 0,
            upper_stop,
            lower_sensor: true,
            upper_sensor: true,
            direction: Direction::Positive,
            step_high: false,
            pulses: 0,
        }
    }
}

/// Simulated two-axis mount
#[derive(Debug, Clone)]
pub(crate) struct SimMount {
    axes: [SimAxis; 2],
    enabled: bool,
    enable_cycles: u32,
    steps_while_disabled: u32,
}

impl SimMount {
    /// 3600 azimuth steps between sensors, 900 altitude steps
    pub(crate) fn new() -> Self {
        Self {
            axes: [SimAxis::new(3600), SimAxis::new(900)],
            enabled: false,
            enable_cycles: 0,
            steps_while_disabled: 0,
        }
    }

    /// Place the mechanism at a physical step position
    pub(crate) fn with_physical(mut self, x: i32, y: i32) -> Self {
        self.axes[0].position = x;
        self.axes[1].position = y;
        self
    }

    /// Change the distance between the sensors of an axis
    pub(crate) fn with_span(mut self, axis: Axis, span: i32) -> Self {
        self.axes[index(axis)].upper_stop = span;
        self
    }

    /// Build with one limit sensor disconnected
    pub(crate) fn without_sensor(mut self, axis: Axis, direction: Direction) -> Self {
        self.disconnect_sensor(axis, direction);
        self
    }

    /// Disconnect one limit sensor
    pub(crate) fn disconnect_sensor(&mut self, axis: Axis, direction: Direction) {
        let sim = &mut self.axes[index(axis)];
        match direction {
            Direction::Positive => sim.upper_sensor = false,
            Direction::Negative => sim.lower_sensor = false,
        }
    }

    /// Shift the mechanism without the controller noticing (lost steps)
    pub(crate) fn slip(&mut self, axis: Axis, steps: i32) {
        let sim = &mut self.axes[index(axis)];
        sim.position = (sim.position + steps).clamp(0, sim.upper_stop);
    }

    pub(crate) fn physical(&self, axis: Axis) -> i32 {
        self.axes[index(axis)].position
    }

    pub(crate) fn pulses(&self, axis: Axis) -> u32 {
        self.axes[index(axis)].pulses
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn enable_cycles(&self) -> u32 {
        self.enable_cycles
    }

    pub(crate) fn steps_while_disabled(&self) -> u32 {
        self.steps_while_disabled
    }
}

fn index(axis: Axis) -> usize {
    match axis {
        Axis::Azimuth => 0,
        Axis::Altitude => 1,
    }
}

impl MountDriver for SimMount {
    fn set_direction(&mut self, axis: Axis, direction: Direction) {
        self.axes[index(axis)].direction = direction;
    }

    fn set_step(&mut self, axis: Axis, high: bool) {
        let enabled = self.enabled;
        let sim = &mut self.axes[index(axis)];
        let rising = high && !sim.step_high;
        sim.step_high = high;
        if !rising {
            return;
        }

        sim.pulses += 1;
        if enabled {
            let next = sim.position + sim.direction.signed(1);
            sim.position = next.clamp(0, sim.upper_stop);
        } else {
            self.steps_while_disabled += 1;
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.enable_cycles += 1;
        }
        self.enabled = enabled;
    }

    fn limit_reached(&self, axis: Axis, direction: Direction) -> bool {
        let sim = &self.axes[index(axis)];
        match direction {
            Direction::Positive => sim.upper_sensor && sim.position >= sim.upper_stop,
            Direction::Negative => sim.lower_sensor && sim.position <= 0,
        }
    }
}

/// Delay that only accumulates the requested time
#[derive(Debug, Default)]
pub(crate) struct CountingDelay {
    pub total_ms: u64,
    pub total_us: u64,
}

impl Delay for CountingDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
    }

    fn delay_us(&mut self, us: u32) {
        self.total_us += u64::from(us);
    }
}
