//! Starpoint Hardware Abstraction Layer
//!
//! This crate defines the hardware capabilities the mount logic consumes.
//! Chip-specific code implements these traits directly, or wraps its
//! `embedded-hal` 1.0 peripherals with the adapters in [`adapter`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Orchestration (serial commands, UI)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  starpoint-core / starpoint-drivers     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  starpoint-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`delay::Delay`] - Blocking millisecond/microsecond waits
//! - [`uart::UartRx`] - Non-blocking serial receive
//! - [`stop::StopSignal`] - Cooperative stop request polled by jogging

#![no_std]
#![deny(unsafe_code)]

pub mod adapter;
pub mod delay;
pub mod gpio;
pub mod stop;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use delay::Delay;
pub use gpio::{InputPin, OutputPin};
pub use stop::{SerialStop, StopSignal};
pub use uart::UartRx;
