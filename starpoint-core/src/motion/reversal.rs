//! Axis reversal
//!
//! The altitude axis only travels from horizon to zenith between its
//! sensors. Targets past zenith are reached by turning the azimuth axis
//! half a turn and mirroring the altitude about the zenith. The decision
//! depends only on the requested altitude, so it is stateless.

use super::axis::{MountCalibration, StepPoint};

/// A step target after clamping and reversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResolvedTarget {
    /// Step point to drive to
    pub target: StepPoint,
    /// Whether the mount ends up reversed
    pub reversed: bool,
    /// Whether the requested point was outside the commandable range
    pub clamped: bool,
}

/// Resolve a raw step target into a reachable one
///
/// The raw target is clamped to `[0, max]` per axis first. If the altitude
/// then exceeds the midpoint, it is mirrored and the azimuth is moved by
/// half a turn in whichever direction stays in range.
pub fn resolve_target(raw: StepPoint, calibration: &MountCalibration) -> ResolvedTarget {
    let clamped_raw = calibration.clamp(raw);
    let clamped = clamped_raw != raw;

    let mid_x = calibration.azimuth.midpoint_steps();
    let mid_y = calibration.altitude.midpoint_steps();

    let mut target = clamped_raw;
    let reversed = target.y > mid_y;
    if reversed {
        target.y = mid_y - (target.y - mid_y);
        target.x = if target.x >= mid_x {
            target.x - mid_x
        } else {
            target.x + mid_x
        };
    }

    ResolvedTarget {
        target: calibration.clamp(target),
        reversed,
        clamped,
    }
}

/// Azimuth angle in degrees that a step count represents
pub fn azimuth_degrees(steps: i32, reversed: bool, calibration: &MountCalibration) -> f64 {
    let axis = &calibration.azimuth;
    let logical = if !reversed {
        steps
    } else if steps >= axis.midpoint_steps() {
        steps - axis.midpoint_steps()
    } else {
        steps + axis.midpoint_steps()
    };
    axis.steps_to_degrees(logical)
}

/// Altitude angle in degrees that a step count represents
pub fn altitude_degrees(steps: i32, reversed: bool, calibration: &MountCalibration) -> f64 {
    let axis = &calibration.altitude;
    let logical = if reversed {
        axis.midpoint_steps() + (axis.midpoint_steps() - steps)
    } else {
        steps
    };
    axis.steps_to_degrees(logical)
}
