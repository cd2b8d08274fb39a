//! Hardware abstraction traits
//!
//! These traits define the interface between the mount logic and the
//! pin-level drivers in `starpoint-drivers`.

pub mod laser;
pub mod mount;

pub use laser::LaserOutput;
pub use mount::MountDriver;
