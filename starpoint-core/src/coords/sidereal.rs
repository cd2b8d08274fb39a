//! Sidereal drift correction
//!
//! The sky turns once per sidereal day. Right ascension observed at time
//! `t` is referred back to the epoch `t0` by subtracting the angle the sky
//! has turned in between: `k · (t − t0)`, with the elapsed time expressed
//! as a solar time angle (2π per 86 400 s) and `k` the sidereal rate.

use core::f64::consts::TAU;

use crate::config::SIDEREAL_RATE;

/// Seconds in a solar day
pub const SOLAR_DAY_SECONDS: f64 = 86_400.0;

/// Time origin and sidereal rate
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeReference {
    epoch: f64,
    rate: f64,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self::new(0.0, SIDEREAL_RATE)
    }
}

impl TimeReference {
    /// Create a reference with epoch `t0` (seconds) and rate `k`
    pub const fn new(epoch: f64, rate: f64) -> Self {
        Self { epoch, rate }
    }

    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn set_epoch(&mut self, epoch: f64) {
        self.epoch = epoch;
    }

    /// Angle in radians the sky has turned between the epoch and `time`
    pub fn drift(&self, time: f64) -> f64 {
        self.rate * (time - self.epoch) * TAU / SOLAR_DAY_SECONDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_drift_at_epoch() {
        let reference = TimeReference::new(1_700_000_000.0, SIDEREAL_RATE);
        assert_eq!(reference.drift(1_700_000_000.0), 0.0);
    }

    #[test]
    fn test_one_solar_day_exceeds_full_turn() {
        let reference = TimeReference::new(0.0, SIDEREAL_RATE);
        let drift = reference.drift(SOLAR_DAY_SECONDS);
        assert!((drift - TAU * SIDEREAL_RATE).abs() < 1e-12);
        assert!(drift > TAU);
    }

    #[test]
    fn test_one_hour_is_about_fifteen_degrees() {
        let mut reference = TimeReference::default();
        reference.set_epoch(100.0);
        let drift = reference.drift(3700.0).to_degrees();
        assert!((drift - 15.041).abs() < 1e-3);
        assert!(reference.drift(0.0) < 0.0);
    }
}
