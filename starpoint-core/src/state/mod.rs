//! Mount state machine
//!
//! The mount only accepts targeted moves and jogs once it knows the step
//! scale of both axes.

pub mod events;
pub mod machine;

pub use events::MountEvent;
pub use machine::MountState;
