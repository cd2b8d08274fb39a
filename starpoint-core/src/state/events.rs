//! Events that trigger state transitions

/// Events that can trigger mount state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MountEvent {
    /// A calibration sweep or homing run began
    CalibrationStarted,
    /// Both axes measured or homed
    CalibrationSucceeded,
    /// A limit sensor was not found
    CalibrationFailed,
}
