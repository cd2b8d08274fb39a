//! Axis identities and per-axis calibration
//!
//! Step counts are measured from the lower limit sensor of each axis. The
//! azimuth axis spans a full turn between its sensors; the altitude axis
//! spans horizon to zenith between its sensors but may be commanded up to
//! 180° in step space, which [`super::reversal`] folds back into range.

use serde::{Deserialize, Serialize};

/// Mount axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Horizontal rotation (X)
    Azimuth,
    /// Vertical rotation (Y)
    Altitude,
}

impl Axis {
    /// Both axes, in calibration order
    pub const ALL: [Axis; 2] = [Axis::Azimuth, Axis::Altitude];

    /// Angle covered between the two limit sensors
    pub const fn sensor_span_degrees(self) -> f64 {
        match self {
            Axis::Azimuth => 360.0,
            Axis::Altitude => 90.0,
        }
    }

    /// Logical travel represented in step space
    pub const fn travel_degrees(self) -> f64 {
        match self {
            Axis::Azimuth => 360.0,
            Axis::Altitude => 180.0,
        }
    }

    /// Angle where reversal takes effect
    pub const fn midpoint_degrees(self) -> f64 {
        match self {
            Axis::Azimuth => 180.0,
            Axis::Altitude => 90.0,
        }
    }
}

/// Travel direction along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Toward increasing step counts
    Positive,
    /// Toward the zero sensor
    Negative,
}

impl Direction {
    /// Get the opposite direction
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }

    /// Direction of a signed step delta, `None` for zero
    pub const fn of_delta(delta: i32) -> Option<Self> {
        if delta > 0 {
            Some(Direction::Positive)
        } else if delta < 0 {
            Some(Direction::Negative)
        } else {
            None
        }
    }

    /// Signed value of `steps` taken in this direction
    pub fn signed(self, steps: u32) -> i32 {
        let steps = i32::try_from(steps).unwrap_or(i32::MAX);
        match self {
            Direction::Positive => steps,
            Direction::Negative => -steps,
        }
    }
}

/// A position in step space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepPoint {
    /// Azimuth steps
    pub x: i32,
    /// Altitude steps
    pub y: i32,
}

impl StepPoint {
    /// Create a new step point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Get the component for an axis
    pub const fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Azimuth => self.x,
            Axis::Altitude => self.y,
        }
    }

    /// Set the component for an axis
    pub fn set(&mut self, axis: Axis, steps: i32) {
        match axis {
            Axis::Azimuth => self.x = steps,
            Axis::Altitude => self.y = steps,
        }
    }
}

/// Calibration result for one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisCalibration {
    axis: Axis,
    span_steps: u32,
    steps_per_degree: f64,
    max_steps: i32,
    midpoint_steps: i32,
}

impl AxisCalibration {
    /// Derive the calibration from the step count measured between sensors
    pub fn from_span(axis: Axis, span_steps: u32) -> Self {
        let steps_per_degree = span_steps as f64 / axis.sensor_span_degrees();
        Self {
            axis,
            span_steps,
            steps_per_degree,
            max_steps: libm::rint(axis.travel_degrees() * steps_per_degree) as i32,
            midpoint_steps: libm::rint(axis.midpoint_degrees() * steps_per_degree) as i32,
        }
    }

    /// Axis this calibration belongs to
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Steps counted between the two sensors
    pub fn span_steps(&self) -> u32 {
        self.span_steps
    }

    /// Steps per degree of rotation
    pub fn steps_per_degree(&self) -> f64 {
        self.steps_per_degree
    }

    /// Largest commandable step count
    pub fn max_steps(&self) -> i32 {
        self.max_steps
    }

    /// Step count of the reversal midpoint
    pub fn midpoint_steps(&self) -> i32 {
        self.midpoint_steps
    }

    /// Clamp a step count into `[0, max_steps]`
    pub fn clamp(&self, steps: i32) -> i32 {
        steps.clamp(0, self.max_steps)
    }

    /// Convert degrees to the nearest step count
    pub fn degrees_to_steps(&self, degrees: f64) -> i32 {
        let steps = libm::rint(degrees * self.steps_per_degree);
        // Saturating float to int cast; NaN maps to zero
        steps as i32
    }

    /// Convert a step count to degrees
    pub fn steps_to_degrees(&self, steps: i32) -> f64 {
        if self.steps_per_degree > 0.0 {
            steps as f64 / self.steps_per_degree
        } else {
            0.0
        }
    }

    /// Position recorded when the sensor bounding `direction` trips
    pub fn limit_position(&self, direction: Direction) -> i32 {
        match direction {
            Direction::Negative => 0,
            Direction::Positive => i32::try_from(self.span_steps).unwrap_or(i32::MAX),
        }
    }
}

/// Calibration for both axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MountCalibration {
    /// Azimuth axis
    pub azimuth: AxisCalibration,
    /// Altitude axis
    pub altitude: AxisCalibration,
}

impl MountCalibration {
    /// Build from the spans measured on each axis
    pub fn from_spans(azimuth_span: u32, altitude_span: u32) -> Self {
        Self {
            azimuth: AxisCalibration::from_span(Axis::Azimuth, azimuth_span),
            altitude: AxisCalibration::from_span(Axis::Altitude, altitude_span),
        }
    }

    /// Get the calibration for an axis
    pub fn axis(&self, axis: Axis) -> &AxisCalibration {
        match axis {
            Axis::Azimuth => &self.azimuth,
            Axis::Altitude => &self.altitude,
        }
    }

    /// Clamp both components of a point
    pub fn clamp(&self, point: StepPoint) -> StepPoint {
        StepPoint::new(self.azimuth.clamp(point.x), self.altitude.clamp(point.y))
    }
}
