//! Jog speed ramp
//!
//! Manual jogging starts slow and speeds up in fixed decrements of the
//! pulse half-period until a floor is reached.

use crate::config::JogConfig;

/// Pulse timing generator for a jog
#[derive(Debug, Clone)]
pub struct JogRamp {
    config: JogConfig,
    half_period_us: u32,
    steps: u32,
}

impl JogRamp {
    /// Start a new ramp at the configured initial half-period
    pub fn new(config: JogConfig) -> Self {
        Self {
            half_period_us: config.start_half_period_us,
            config,
            steps: 0,
        }
    }

    /// Half-period to use for the next pulse
    pub fn half_period_us(&self) -> u32 {
        self.half_period_us
    }

    /// Steps taken so far
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Record one completed step and speed up when due
    pub fn on_step(&mut self) {
        self.steps = self.steps.saturating_add(1);

        let every = self.config.steps_per_increment;
        if every == 0 || self.steps % every != 0 {
            return;
        }
        if self.half_period_us > self.config.floor_half_period_us {
            self.half_period_us = self
                .half_period_us
                .saturating_sub(self.config.decrement_us)
                .max(self.config.floor_half_period_us);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_starts_slow() {
        let ramp = JogRamp::new(JogConfig::default());
        assert_eq!(ramp.half_period_us(), 7100);
        assert_eq!(ramp.steps(), 0);
    }

    #[test]
    fn test_ramp_speeds_up_every_increment() {
        let mut ramp = JogRamp::new(JogConfig::default());
        for _ in 0..49 {
            ramp.on_step();
        }
        assert_eq!(ramp.half_period_us(), 7100);
        ramp.on_step();
        assert_eq!(ramp.half_period_us(), 6100);
        for _ in 0..50 {
            ramp.on_step();
        }
        assert_eq!(ramp.half_period_us(), 5100);
    }

    #[test]
    fn test_ramp_stops_at_floor() {
        let mut ramp = JogRamp::new(JogConfig::default());
        for _ in 0..1000 {
            ramp.on_step();
        }
        assert_eq!(ramp.half_period_us(), 1100);
        assert_eq!(ramp.steps(), 1000);
    }

    #[test]
    fn test_ramp_never_undershoots_floor() {
        let config = JogConfig {
            start_half_period_us: 2500,
            floor_half_period_us: 1100,
            decrement_us: 1000,
            steps_per_increment: 1,
        };
        let mut ramp = JogRamp::new(config);
        ramp.on_step();
        assert_eq!(ramp.half_period_us(), 1500);
        ramp.on_step();
        assert_eq!(ramp.half_period_us(), 1100);
    }

    #[test]
    fn test_zero_increment_disables_ramp() {
        let config = JogConfig {
            steps_per_increment: 0,
            ..JogConfig::default()
        };
        let mut ramp = JogRamp::new(config);
        for _ in 0..500 {
            ramp.on_step();
        }
        assert_eq!(ramp.half_period_us(), 7100);
    }
}
