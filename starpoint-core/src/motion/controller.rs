//! Motion controller
//!
//! Owns the mount driver, the delay source, the calibration and the step
//! position of both axes. All operations block until the mechanism stops.
//!
//! ```text
//! calibrate()/home() ──► Ready ──► point_to() ──► resolve_target ──► DDA / sequential
//!                              └─► jog()      ──► JogRamp until limit or stop
//! ```

use starpoint_hal::{Delay, StopSignal};

use super::axis::{Axis, Direction, MountCalibration, StepPoint};
use super::dda::DdaLine;
use super::pulse::Pulser;
use super::ramp::JogRamp;
use super::reversal::{self, resolve_target};
use crate::config::MotionConfig;
use crate::state::{MountEvent, MountState};
use crate::traits::MountDriver;

/// Calibration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// The sensor bounding `direction` on `axis` did not trip within the step cap
    SensorNotFound { axis: Axis, direction: Direction },
}

/// Motion errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// The mount has not been calibrated or homed
    NotCalibrated,
    /// A requested angle is NaN or infinite
    InvalidTarget,
}

/// How a two-axis move is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveMethod {
    /// Both axes together along a straight line in step space
    #[default]
    Dda,
    /// Azimuth fully, then altitude
    Sequential,
}

/// Outcome of a targeted move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveReport {
    /// Step target after clamping and reversal
    pub target: StepPoint,
    /// Recorded position when the move ended
    pub position: StepPoint,
    /// A limit sensor stopped an axis short of its target
    pub limit_reached: bool,
    /// The request was outside the commandable range and was clamped
    pub clamped: bool,
}

/// Outcome of a jog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JogOutcome {
    /// Steps taken
    pub steps: u32,
    /// The jog ended on the limit sensor rather than a stop request
    pub limit_reached: bool,
}

/// Two-axis motion controller
pub struct MotionController<M: MountDriver, D: Delay> {
    mount: M,
    delay: D,
    config: MotionConfig,
    state: MountState,
    calibration: Option<MountCalibration>,
    position: StepPoint,
    reversed: bool,
}

impl<M: MountDriver, D: Delay> MotionController<M, D> {
    /// Create a controller; motors start unpowered
    pub fn new(mut mount: M, delay: D, config: MotionConfig) -> Self {
        mount.set_enabled(false);
        Self {
            mount,
            delay,
            config,
            state: MountState::Uninitialized,
            calibration: None,
            position: StepPoint::default(),
            reversed: false,
        }
    }

    /// Current state
    pub fn state(&self) -> MountState {
        self.state
    }

    /// Motion configuration
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Calibration in use, if any
    pub fn calibration(&self) -> Option<&MountCalibration> {
        self.calibration.as_ref()
    }

    /// Current step position
    pub fn position(&self) -> StepPoint {
        self.position
    }

    /// Current step count of one axis
    pub fn steps(&self, axis: Axis) -> i32 {
        self.position.get(axis)
    }

    /// Whether the mount is pointing past zenith
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Access the mount driver
    pub fn mount(&self) -> &M {
        &self.mount
    }

    /// Mutable access to the mount driver
    ///
    /// Stepping the mechanism through this reference is not tracked and
    /// leaves the recorded position stale until the next calibration.
    pub fn mount_mut(&mut self) -> &mut M {
        &mut self.mount
    }

    /// Take back the driver and delay
    pub fn release(self) -> (M, D) {
        (self.mount, self.delay)
    }

    /// Measure both axes end to end against their limit sensors
    ///
    /// Each axis is driven to its upper sensor, then the steps back to the
    /// lower sensor are counted. Leaves the mount at (0, 0).
    pub fn calibrate(&mut self) -> Result<MountCalibration, CalibrationError> {
        info!("Calibrating mount");
        self.state = self.state.transition(MountEvent::CalibrationStarted);

        let cap = self.config.timing.probe_step_cap;
        let result = {
            let mut pulser = Pulser::new(&mut self.mount, &mut self.delay, self.config.timing);
            measure_spans(&mut pulser, cap)
        };

        self.finish_calibration(result)
    }

    /// Adopt a stored calibration after driving both axes to their lower sensors
    pub fn home(&mut self, calibration: MountCalibration) -> Result<(), CalibrationError> {
        info!("Homing mount");
        self.state = self.state.transition(MountEvent::CalibrationStarted);

        let cap = self.config.timing.probe_step_cap;
        let result = {
            let mut pulser = Pulser::new(&mut self.mount, &mut self.delay, self.config.timing);
            Axis::ALL
                .iter()
                .try_for_each(|&axis| probe(&mut pulser, axis, Direction::Negative, cap).map(drop))
        };

        self.finish_calibration(result.map(|()| calibration)).map(drop)
    }

    fn finish_calibration(
        &mut self,
        result: Result<MountCalibration, CalibrationError>,
    ) -> Result<MountCalibration, CalibrationError> {
        self.position = StepPoint::default();
        self.reversed = false;

        match result {
            Ok(calibration) => {
                info!(
                    "Mount ready: azimuth {} steps, altitude {} steps",
                    calibration.azimuth.span_steps(),
                    calibration.altitude.span_steps()
                );
                self.calibration = Some(calibration);
                self.state = self.state.transition(MountEvent::CalibrationSucceeded);
                Ok(calibration)
            }
            Err(e) => {
                self.calibration = None;
                self.state = self.state.transition(MountEvent::CalibrationFailed);
                Err(e)
            }
        }
    }

    /// Point at a horizontal direction using a DDA move
    pub fn point_to(&mut self, azimuth: f64, altitude: f64) -> Result<MoveReport, MotionError> {
        self.point_to_with(azimuth, altitude, MoveMethod::Dda)
    }

    /// Point at a horizontal direction (radians)
    ///
    /// Altitudes past zenith are reached from the opposite azimuth. Targets
    /// outside the commandable range are clamped and reported.
    pub fn point_to_with(
        &mut self,
        azimuth: f64,
        altitude: f64,
        method: MoveMethod,
    ) -> Result<MoveReport, MotionError> {
        let calibration = self.ready_calibration()?;
        if !azimuth.is_finite() || !altitude.is_finite() {
            warn!("Rejected non-finite target");
            return Err(MotionError::InvalidTarget);
        }
        let raw = self.angles_to_steps(azimuth, altitude, &calibration);
        let resolved = resolve_target(raw, &calibration);

        if resolved.clamped {
            warn!("Target clamped: requested x={} y={}", raw.x, raw.y);
        }
        if resolved.reversed != self.reversed {
            debug!("Axis reversal: {}", resolved.reversed);
            self.reversed = resolved.reversed;
        }

        let mut report = self.execute(resolved.target, method, &calibration);
        report.clamped = resolved.clamped;
        Ok(report)
    }

    /// Move to an absolute step position without reversal handling
    pub fn move_to(
        &mut self,
        target: StepPoint,
        method: MoveMethod,
    ) -> Result<MoveReport, MotionError> {
        let calibration = self.ready_calibration()?;
        let clamped_target = calibration.clamp(target);
        let clamped = clamped_target != target;
        if clamped {
            warn!("Step target clamped: requested x={} y={}", target.x, target.y);
        }

        let mut report = self.execute(clamped_target, method, &calibration);
        report.clamped = clamped;
        Ok(report)
    }

    /// Jog one axis with a speed ramp until its sensor trips or `stop` fires
    ///
    /// `stop` is reset before the first step, then polled once after every
    /// step.
    pub fn jog<S: StopSignal>(
        &mut self,
        axis: Axis,
        direction: Direction,
        mut stop: S,
    ) -> Result<JogOutcome, MotionError> {
        let calibration = self.ready_calibration()?;
        stop.reset();

        let (steps, limit_reached) = {
            let mut pulser = Pulser::new(&mut self.mount, &mut self.delay, self.config.timing);
            let mut ramp = JogRamp::new(self.config.jog);
            pulser.set_direction(axis, direction);

            while !pulser.limit_reached(axis, direction) {
                pulser.pulse(axis, ramp.half_period_us());
                ramp.on_step();
                if stop.stop_requested() {
                    break;
                }
            }
            (ramp.steps(), pulser.limit_reached(axis, direction))
        };

        let moved = self.position.get(axis).saturating_add(direction.signed(steps));
        self.position.set(axis, calibration.axis(axis).clamp(moved));

        debug!("Jog finished after {} steps, limit {}", steps, limit_reached);
        Ok(JogOutcome {
            steps,
            limit_reached,
        })
    }

    /// Current azimuth in radians
    pub fn azimuth(&self) -> Result<f64, MotionError> {
        self.angle(Axis::Azimuth)
    }

    /// Current altitude in radians
    pub fn altitude(&self) -> Result<f64, MotionError> {
        self.angle(Axis::Altitude)
    }

    /// Current angle of an axis in radians, accounting for reversal
    pub fn angle(&self, axis: Axis) -> Result<f64, MotionError> {
        let calibration = self.calibration.ok_or(MotionError::NotCalibrated)?;
        let steps = self.position.get(axis);

        let degrees = match axis {
            Axis::Azimuth => {
                let degrees = reversal::azimuth_degrees(steps, self.reversed, &calibration);
                if self.config.azimuth_inverted {
                    mirror_azimuth(degrees)
                } else {
                    degrees
                }
            }
            Axis::Altitude => reversal::altitude_degrees(steps, self.reversed, &calibration),
        };

        Ok(degrees.to_radians())
    }

    fn ready_calibration(&self) -> Result<MountCalibration, MotionError> {
        match (self.state.motion_allowed(), self.calibration) {
            (true, Some(calibration)) => Ok(calibration),
            _ => Err(MotionError::NotCalibrated),
        }
    }

    fn angles_to_steps(
        &self,
        azimuth: f64,
        altitude: f64,
        calibration: &MountCalibration,
    ) -> StepPoint {
        let mut azimuth = azimuth.to_degrees();
        if self.config.azimuth_inverted {
            azimuth = mirror_azimuth(azimuth);
        }
        StepPoint::new(
            calibration.azimuth.degrees_to_steps(azimuth),
            calibration.altitude.degrees_to_steps(altitude.to_degrees()),
        )
    }

    fn execute(
        &mut self,
        target: StepPoint,
        method: MoveMethod,
        calibration: &MountCalibration,
    ) -> MoveReport {
        let from = self.position;
        if target == from {
            return MoveReport {
                target,
                position: from,
                limit_reached: false,
                clamped: false,
            };
        }

        let position = {
            let mut pulser = Pulser::new(&mut self.mount, &mut self.delay, self.config.timing);
            match method {
                MoveMethod::Dda => move_dda(&mut pulser, from, target, calibration),
                MoveMethod::Sequential => move_sequential(&mut pulser, from, target, calibration),
            }
        };
        self.position = calibration.clamp(position);

        let limit_reached = self.position != target;
        if limit_reached {
            warn!(
                "Limit sensor stopped move at x={} y={}",
                self.position.x, self.position.y
            );
        }

        MoveReport {
            target,
            position: self.position,
            limit_reached,
            clamped: false,
        }
    }
}

/// Map azimuth degrees to the opposite rotation sense, within [0, 360)
fn mirror_azimuth(degrees: f64) -> f64 {
    let mirrored = 360.0 - degrees;
    if mirrored >= 360.0 {
        mirrored - 360.0
    } else {
        mirrored
    }
}

/// Sweep both axes and count the steps between their sensors
fn measure_spans<M: MountDriver, D: Delay>(
    pulser: &mut Pulser<'_, M, D>,
    cap: u32,
) -> Result<MountCalibration, CalibrationError> {
    let mut spans = [0u32; 2];
    for (span, axis) in spans.iter_mut().zip(Axis::ALL) {
        probe(pulser, axis, Direction::Positive, cap)?;
        *span = probe(pulser, axis, Direction::Negative, cap)?;
        debug!("Measured {} steps on {}", *span, axis);
    }
    Ok(MountCalibration::from_spans(spans[0], spans[1]))
}

/// Drive toward a sensor, returning the steps taken to reach it
fn probe<M: MountDriver, D: Delay>(
    pulser: &mut Pulser<'_, M, D>,
    axis: Axis,
    direction: Direction,
    cap: u32,
) -> Result<u32, CalibrationError> {
    let run = pulser.run(axis, direction, cap, true);
    if run.limit_reached {
        Ok(run.taken)
    } else {
        warn!("No limit sensor on {} {} within {} steps", axis, direction, cap);
        Err(CalibrationError::SensorNotFound { axis, direction })
    }
}

/// Step one axis by `delta`, updating `position`
///
/// Returns true if the limit sensor tripped, in which case the position is
/// set to the sensor's calibrated location.
fn advance<M: MountDriver, D: Delay>(
    pulser: &mut Pulser<'_, M, D>,
    position: &mut StepPoint,
    axis: Axis,
    delta: i32,
    settle: bool,
    calibration: &MountCalibration,
) -> bool {
    let Some(direction) = Direction::of_delta(delta) else {
        return false;
    };

    let run = pulser.run(axis, direction, delta.unsigned_abs(), settle);
    let next = if run.limit_reached {
        trace!("{} sensor tripped after {} steps", axis, run.taken);
        calibration.axis(axis).limit_position(direction)
    } else {
        position.get(axis) + direction.signed(run.taken)
    };
    position.set(axis, next);
    run.limit_reached
}

fn move_dda<M: MountDriver, D: Delay>(
    pulser: &mut Pulser<'_, M, D>,
    from: StepPoint,
    to: StepPoint,
    calibration: &MountCalibration,
) -> StepPoint {
    let mut position = from;
    let mut blocked = [false; 2];

    for step in DdaLine::new(from, to) {
        let deltas = [(Axis::Azimuth, step.dx), (Axis::Altitude, step.dy)];
        for ((axis, delta), stopped) in deltas.into_iter().zip(blocked.iter_mut()) {
            if *stopped {
                continue;
            }
            *stopped = advance(pulser, &mut position, axis, delta, false, calibration);
        }
        if blocked == [true, true] {
            break;
        }
    }

    position
}

fn move_sequential<M: MountDriver, D: Delay>(
    pulser: &mut Pulser<'_, M, D>,
    from: StepPoint,
    to: StepPoint,
    calibration: &MountCalibration,
) -> StepPoint {
    let mut position = from;
    for axis in Axis::ALL {
        let delta = to.get(axis) - from.get(axis);
        advance(pulser, &mut position, axis, delta, true, calibration);
    }
    position
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::sim::{CountingDelay, SimMount};
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_4};
    use core::sync::atomic::AtomicBool;
    use proptest::prelude::*;
    use starpoint_hal::{SerialStop, UartRx};

    type Controller = MotionController<SimMount, CountingDelay>;

    fn controller(mount: SimMount) -> Controller {
        MotionController::new(mount, CountingDelay::default(), MotionConfig::default())
    }

    fn calibrated() -> Controller {
        let mut controller = controller(SimMount::new().with_physical(1234, 321));
        controller.calibrate().unwrap();
        controller
    }

    fn deg(degrees: f64) -> f64 {
        degrees.to_radians()
    }

    /// Stop signal that fires on its n-th poll
    struct StopAfter(u32);

    impl StopSignal for StopAfter {
        fn stop_requested(&mut self) -> bool {
            if self.0 <= 1 {
                true
            } else {
                self.0 -= 1;
                false
            }
        }
    }

    /// Receiver that plays back a byte script, `None` marking an idle poll
    struct ScriptRx<'a> {
        data: &'a [Option<u8>],
        pos: usize,
    }

    impl UartRx for ScriptRx<'_> {
        type Error = ();

        fn try_read_byte(&mut self) -> Result<Option<u8>, ()> {
            let byte = self.data.get(self.pos).copied().flatten();
            self.pos += 1;
            Ok(byte)
        }
    }

    #[test]
    fn test_new_controller_is_unpowered() {
        let controller = controller(SimMount::new());
        assert_eq!(controller.state(), MountState::Uninitialized);
        assert!(!controller.mount().enabled());
        assert!(controller.calibration().is_none());
    }

    #[test]
    fn test_calibration_measures_spans() {
        let mut controller = controller(SimMount::new().with_physical(1234, 321));
        let calibration = controller.calibrate().unwrap();

        assert_eq!(calibration.azimuth.span_steps(), 3600);
        assert_eq!(calibration.altitude.span_steps(), 900);
        assert_eq!(calibration.azimuth.steps_per_degree(), 10.0);
        assert_eq!(calibration.altitude.steps_per_degree(), 10.0);
        assert_eq!(controller.state(), MountState::Ready);
        assert_eq!(controller.position(), StepPoint::new(0, 0));

        let (mount, delay) = controller.release();
        assert_eq!(mount.physical(Axis::Azimuth), 0);
        assert_eq!(mount.physical(Axis::Altitude), 0);
        assert!(!mount.enabled());
        assert_eq!(mount.enable_cycles(), 1);
        // One settle pause per probe
        assert_eq!(delay.total_ms, 200);
    }

    #[test]
    fn test_calibration_with_uneven_span() {
        let mount = SimMount::new().with_span(Axis::Azimuth, 4000);
        let mut controller = controller(mount);
        let calibration = controller.calibrate().unwrap();
        assert_eq!(calibration.azimuth.span_steps(), 4000);
        assert_eq!(calibration.azimuth.midpoint_steps(), 2000);
    }

    #[test]
    fn test_missing_sensor_fails_calibration() {
        let mount = SimMount::new().without_sensor(Axis::Altitude, Direction::Negative);
        let mut controller = controller(mount);

        assert_eq!(
            controller.calibrate(),
            Err(CalibrationError::SensorNotFound {
                axis: Axis::Altitude,
                direction: Direction::Negative,
            })
        );
        assert_eq!(controller.state(), MountState::Uninitialized);
        assert!(controller.calibration().is_none());
        assert!(!controller.mount().enabled());
        assert_eq!(controller.point_to(0.0, 0.0), Err(MotionError::NotCalibrated));
    }

    #[test]
    fn test_probe_stops_at_step_cap() {
        let mount = SimMount::new().without_sensor(Axis::Azimuth, Direction::Positive);
        let mut controller = controller(mount);
        assert!(controller.calibrate().is_err());
        assert_eq!(controller.mount().pulses(Axis::Azimuth), 10_000);
    }

    #[test]
    fn test_failed_recalibration_drops_old_calibration() {
        let mut controller = calibrated();
        controller
            .mount_mut()
            .disconnect_sensor(Axis::Azimuth, Direction::Positive);

        assert!(controller.calibrate().is_err());
        assert_eq!(controller.state(), MountState::Uninitialized);
        assert_eq!(controller.azimuth(), Err(MotionError::NotCalibrated));
    }

    #[test]
    fn test_motion_requires_calibration() {
        let mut controller = controller(SimMount::new());
        assert_eq!(controller.point_to(0.1, 0.1), Err(MotionError::NotCalibrated));
        assert_eq!(
            controller.move_to(StepPoint::new(10, 10), MoveMethod::Dda),
            Err(MotionError::NotCalibrated)
        );
        let flag = AtomicBool::new(true);
        assert_eq!(
            controller.jog(Axis::Azimuth, Direction::Positive, &flag),
            Err(MotionError::NotCalibrated)
        );
        assert_eq!(controller.mount().pulses(Axis::Azimuth), 0);
    }

    #[test]
    fn test_point_to_concrete_scenario() {
        let mut controller = calibrated();
        let report = controller.point_to(deg(90.0), deg(45.0)).unwrap();

        assert_eq!(report.target, StepPoint::new(900, 450));
        assert_eq!(report.position, StepPoint::new(900, 450));
        assert!(!report.limit_reached);
        assert!(!report.clamped);
        assert!(!controller.is_reversed());

        assert!((controller.azimuth().unwrap() - FRAC_PI_2).abs() < 1e-9);
        assert!((controller.altitude().unwrap() - FRAC_PI_4).abs() < 1e-9);

        let (mount, delay) = controller.release();
        assert_eq!(mount.physical(Axis::Azimuth), 900);
        assert_eq!(mount.physical(Axis::Altitude), 450);
        assert!(!mount.enabled());
        assert_eq!(mount.steps_while_disabled(), 0);
        // DDA iterations do not pause to settle
        assert_eq!(delay.total_ms, 200);
    }

    #[test]
    fn test_zero_length_move_does_not_power_motors() {
        let mut controller = calibrated();
        let cycles = controller.mount().enable_cycles();
        let report = controller.move_to(StepPoint::new(0, 0), MoveMethod::Dda).unwrap();
        assert_eq!(report.position, StepPoint::new(0, 0));
        assert_eq!(controller.mount().enable_cycles(), cycles);
    }

    #[test]
    fn test_reversal_is_idempotent() {
        let mut controller = calibrated();

        let first = controller.point_to(deg(90.0), deg(120.0)).unwrap();
        assert!(controller.is_reversed());
        assert_eq!(first.target, StepPoint::new(2700, 600));

        let pulses = controller.mount().pulses(Axis::Azimuth);
        let second = controller.point_to(deg(90.0), deg(120.0)).unwrap();
        assert!(controller.is_reversed());
        assert_eq!(second.target, first.target);
        assert_eq!(controller.mount().pulses(Axis::Azimuth), pulses);
    }

    #[test]
    fn test_reversed_position_reports_true_orientation() {
        let mut controller = calibrated();
        controller.point_to(deg(90.0), deg(120.0)).unwrap();

        assert!((controller.azimuth().unwrap() - deg(90.0)).abs() < 1e-9);
        assert!((controller.altitude().unwrap() - deg(120.0)).abs() < 1e-9);

        controller.point_to(deg(90.0), deg(30.0)).unwrap();
        assert!(!controller.is_reversed());
        assert_eq!(controller.position(), StepPoint::new(900, 300));
    }

    #[test]
    fn test_out_of_range_targets_are_clamped() {
        let mut controller = calibrated();

        let report = controller.point_to(deg(-20.0), deg(10.0)).unwrap();
        assert!(report.clamped);
        assert_eq!(report.position, StepPoint::new(0, 100));

        let report = controller.point_to(deg(400.0), deg(10.0)).unwrap();
        assert!(report.clamped);
        assert_eq!(report.position, StepPoint::new(3600, 100));

        let report = controller.move_to(StepPoint::new(-5, 5000), MoveMethod::Dda).unwrap();
        assert!(report.clamped);
        assert_eq!(report.target, StepPoint::new(0, 1800));
    }

    #[test]
    fn test_limit_trip_mid_move_stops_one_axis() {
        let mut controller = calibrated();
        // Altitude lost 200 steps upward without being commanded
        controller.mount_mut().slip(Axis::Altitude, 200);

        let report = controller.point_to(deg(45.0), deg(80.0)).unwrap();
        assert!(report.limit_reached);
        assert_eq!(report.target, StepPoint::new(450, 800));
        // Altitude recorded at its sensor, azimuth completed
        assert_eq!(report.position, StepPoint::new(450, 900));

        let mount = controller.mount();
        assert_eq!(mount.physical(Axis::Azimuth), 450);
        assert_eq!(mount.physical(Axis::Altitude), 900);
        assert!(!mount.enabled());
    }

    #[test]
    fn test_azimuth_limit_trip_mid_move_lets_altitude_finish() {
        let mut controller = calibrated();
        controller.mount_mut().slip(Axis::Azimuth, 200);

        let report = controller.point_to(deg(350.0), deg(45.0)).unwrap();
        assert!(report.limit_reached);
        assert_eq!(report.target, StepPoint::new(3500, 450));
        // Azimuth recorded at its full-rotation sensor, altitude completed
        assert_eq!(report.position, StepPoint::new(3600, 450));

        let mount = controller.mount();
        assert_eq!(mount.physical(Axis::Azimuth), 3600);
        assert_eq!(mount.physical(Axis::Altitude), 450);
    }

    #[test]
    fn test_non_finite_target_is_rejected() {
        let mut controller = calibrated();
        controller.point_to(deg(30.0), deg(20.0)).unwrap();
        let pulses = controller.mount().pulses(Axis::Azimuth);

        assert_eq!(controller.point_to(f64::NAN, 0.5), Err(MotionError::InvalidTarget));
        assert_eq!(
            controller.point_to(0.5, f64::INFINITY),
            Err(MotionError::InvalidTarget)
        );
        assert_eq!(
            controller.point_to_with(f64::NEG_INFINITY, f64::NAN, MoveMethod::Sequential),
            Err(MotionError::InvalidTarget)
        );
        assert_eq!(controller.position(), StepPoint::new(300, 200));
        assert_eq!(controller.mount().pulses(Axis::Azimuth), pulses);
    }

    #[test]
    fn test_sequential_move() {
        let mut controller = calibrated();
        let report = controller
            .point_to_with(deg(30.0), deg(20.0), MoveMethod::Sequential)
            .unwrap();
        assert_eq!(report.position, StepPoint::new(300, 200));

        let (mount, delay) = controller.release();
        assert_eq!(mount.physical(Axis::Azimuth), 300);
        assert_eq!(mount.physical(Axis::Altitude), 200);
        // Each axis run settles first
        assert_eq!(delay.total_ms, 300);
    }

    #[test]
    fn test_inverted_azimuth() {
        let config = MotionConfig {
            azimuth_inverted: true,
            ..MotionConfig::default()
        };
        let mut controller = MotionController::new(SimMount::new(), CountingDelay::default(), config);
        controller.calibrate().unwrap();

        let report = controller.point_to(deg(90.0), deg(45.0)).unwrap();
        assert_eq!(report.position, StepPoint::new(2700, 450));
        assert!((controller.azimuth().unwrap() - deg(90.0)).abs() < 1e-9);

        // Azimuth 0 maps onto the zero sensor rather than the far end
        let report = controller.point_to(0.0, deg(45.0)).unwrap();
        assert_eq!(report.position.x, 0);
        assert!(controller.azimuth().unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_jog_until_stop() {
        let mut controller = controller(SimMount::new());
        controller.home(MountCalibration::from_spans(3600, 900)).unwrap();

        let outcome = controller
            .jog(Axis::Azimuth, Direction::Positive, StopAfter(120))
            .unwrap();
        assert_eq!(outcome, JogOutcome { steps: 120, limit_reached: false });
        assert_eq!(controller.position(), StepPoint::new(120, 0));

        let (mount, delay) = controller.release();
        assert_eq!(mount.physical(Axis::Azimuth), 120);
        assert!(!mount.enabled());
        // Homing takes one pulse per axis; the jog ramps 7100 -> 6100 -> 5100 µs
        let homing = 2 * 2 * 1200;
        let jog = 2 * (50 * 7100 + 50 * 6100 + 20 * 5100);
        assert_eq!(delay.total_us, homing + jog);
    }

    #[test]
    fn test_jog_until_limit() {
        let mut controller = calibrated();
        let never = AtomicBool::new(false);

        let outcome = controller
            .jog(Axis::Altitude, Direction::Positive, &never)
            .unwrap();
        assert_eq!(outcome, JogOutcome { steps: 900, limit_reached: true });
        assert_eq!(controller.steps(Axis::Altitude), 900);

        let outcome = controller
            .jog(Axis::Altitude, Direction::Positive, &never)
            .unwrap();
        assert_eq!(outcome, JogOutcome { steps: 0, limit_reached: true });
    }

    #[test]
    fn test_jog_position_is_clamped() {
        let mut controller = calibrated();
        // Mechanism sits 50 steps above where the controller thinks it is
        controller.mount_mut().slip(Axis::Azimuth, 50);

        let never = AtomicBool::new(false);
        let outcome = controller
            .jog(Axis::Azimuth, Direction::Negative, &never)
            .unwrap();
        assert_eq!(outcome.steps, 50);
        assert!(outcome.limit_reached);
        assert_eq!(controller.steps(Axis::Azimuth), 0);
    }

    #[test]
    fn test_jog_discards_bytes_left_by_earlier_jog() {
        let mut controller = calibrated();
        controller
            .move_to(StepPoint::new(0, 899), MoveMethod::Dda)
            .unwrap();

        // "ab" arrives during the first jog, "cde" during the second
        let script = [Some(b'a'), Some(b'b'), None, Some(b'c'), Some(b'd'), Some(b'e')];
        let mut stop = SerialStop::new(ScriptRx { data: &script, pos: 0 });

        let outcome = controller
            .jog(Axis::Altitude, Direction::Positive, &mut stop)
            .unwrap();
        assert_eq!(outcome, JogOutcome { steps: 1, limit_reached: true });

        // Five bytes in total would overflow the command buffer
        let outcome = controller
            .jog(Axis::Altitude, Direction::Negative, &mut stop)
            .unwrap();
        assert_eq!(outcome, JogOutcome { steps: 900, limit_reached: true });
        assert_eq!(controller.steps(Axis::Altitude), 0);
    }

    #[test]
    fn test_home_with_stored_calibration() {
        let mut controller = controller(SimMount::new().with_physical(500, 200));
        controller.home(MountCalibration::from_spans(3600, 900)).unwrap();

        assert_eq!(controller.state(), MountState::Ready);
        assert_eq!(controller.position(), StepPoint::new(0, 0));
        assert_eq!(controller.mount().physical(Axis::Azimuth), 0);
        assert_eq!(controller.mount().physical(Axis::Altitude), 0);
        assert_eq!(controller.mount().pulses(Axis::Azimuth), 500);
    }

    #[test]
    fn test_home_without_sensor_fails() {
        let mount = SimMount::new()
            .with_physical(500, 200)
            .without_sensor(Axis::Azimuth, Direction::Negative);
        let mut controller = controller(mount);
        assert_eq!(
            controller.home(MountCalibration::from_spans(3600, 900)),
            Err(CalibrationError::SensorNotFound {
                axis: Axis::Azimuth,
                direction: Direction::Negative,
            })
        );
        assert_eq!(controller.state(), MountState::Uninitialized);
    }

    proptest! {
        #[test]
        fn prop_moves_track_the_mechanism(
            targets in proptest::collection::vec((0.0f64..360.0, 0.0f64..180.0), 1..4)
        ) {
            let mut controller = calibrated();
            for (az, alt) in targets {
                let report = controller.point_to(deg(az), deg(alt)).unwrap();
                prop_assert!(!report.limit_reached);
                prop_assert_eq!(report.position, report.target);

                let mount = controller.mount();
                prop_assert_eq!(mount.physical(Axis::Azimuth), report.position.x);
                prop_assert_eq!(mount.physical(Axis::Altitude), report.position.y);
                prop_assert!(!mount.enabled());
            }
        }
    }
}
