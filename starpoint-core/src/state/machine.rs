//! State machine definition

use super::events::MountEvent;

/// Mount states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MountState {
    /// Step scale unknown; no targeted motion allowed
    #[default]
    Uninitialized,
    /// Sweeping or homing against the limit sensors
    Calibrating,
    /// Calibrated; moves and jogs are accepted
    Ready,
}

impl MountState {
    /// Check if this state allows moves and jogs
    pub fn motion_allowed(&self) -> bool {
        matches!(self, MountState::Ready)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: MountEvent) -> Self {
        use MountEvent::*;
        use MountState::*;

        match (self, event) {
            // A new calibration may start from any state
            (_, CalibrationStarted) => Calibrating,

            (Calibrating, CalibrationSucceeded) => Ready,
            (Calibrating, CalibrationFailed) => Uninitialized,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert_eq!(MountState::default(), MountState::Uninitialized);
        assert!(!MountState::default().motion_allowed());
    }

    #[test]
    fn test_calibration_path() {
        let state = MountState::Uninitialized
            .transition(MountEvent::CalibrationStarted)
            .transition(MountEvent::CalibrationSucceeded);
        assert_eq!(state, MountState::Ready);
        assert!(state.motion_allowed());
    }

    #[test]
    fn test_failed_calibration_drops_readiness() {
        let state = MountState::Ready
            .transition(MountEvent::CalibrationStarted)
            .transition(MountEvent::CalibrationFailed);
        assert_eq!(state, MountState::Uninitialized);
    }

    #[test]
    fn test_stray_events_are_ignored() {
        assert_eq!(
            MountState::Uninitialized.transition(MountEvent::CalibrationSucceeded),
            MountState::Uninitialized
        );
        assert_eq!(
            MountState::Ready.transition(MountEvent::CalibrationFailed),
            MountState::Ready
        );
    }
}
