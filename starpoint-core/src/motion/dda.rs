//! Digital differential analyzer for straight-line moves
//!
//! A move from one step point to another is split into `max(|dx|, |dy|)`
//! iterations. Each iteration advances a real-valued position by a fixed
//! per-axis increment and rounds it to whole steps; the difference from the
//! previous rounded position is the number of steps to take on that axis.
//! The per-axis increments never exceed one step, so every iteration moves
//! each axis by at most a single step and both axes arrive together.

use super::axis::StepPoint;

/// Steps to take in one DDA iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DdaStep {
    /// Signed azimuth steps for this iteration
    pub dx: i32,
    /// Signed altitude steps for this iteration
    pub dy: i32,
    /// Rounded position after this iteration
    pub position: StepPoint,
}

/// Iterator over the steps of a straight-line move
#[derive(Debug, Clone)]
pub struct DdaLine {
    target: StepPoint,
    increment: (f64, f64),
    exact: (f64, f64),
    current: StepPoint,
    iterations: u32,
    index: u32,
}

impl DdaLine {
    /// Plan a line from `from` to `to`
    pub fn new(from: StepPoint, to: StepPoint) -> Self {
        let dx = i64::from(to.x) - i64::from(from.x);
        let dy = i64::from(to.y) - i64::from(from.y);
        let iterations = dx.unsigned_abs().max(dy.unsigned_abs());
        let iterations = u32::try_from(iterations).unwrap_or(u32::MAX);

        let increment = if iterations == 0 {
            (0.0, 0.0)
        } else {
            (dx as f64 / iterations as f64, dy as f64 / iterations as f64)
        };

        Self {
            target: to,
            increment,
            exact: (from.x as f64, from.y as f64),
            current: from,
            iterations,
            index: 0,
        }
    }

    /// Total number of iterations
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Final point of the line
    pub fn target(&self) -> StepPoint {
        self.target
    }
}

impl Iterator for DdaLine {
    type Item = DdaStep;

    fn next(&mut self) -> Option<DdaStep> {
        if self.index >= self.iterations {
            return None;
        }
        self.index += 1;

        let next = if self.index == self.iterations {
            // Land exactly on target regardless of accumulated rounding
            self.target
        } else {
            self.exact.0 += self.increment.0;
            self.exact.1 += self.increment.1;
            StepPoint::new(
                libm::rint(self.exact.0) as i32,
                libm::rint(self.exact.1) as i32,
            )
        };

        let step = DdaStep {
            dx: next.x - self.current.x,
            dy: next.y - self.current.y,
            position: next,
        };
        self.current = next;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.iterations - self.index) as usize;
        (remaining, Some(remaining))
    }
}
