//! Board-agnostic core logic for the pointing mount
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Mount driver and laser traits
//! - Motion control: limit-sensor calibration, DDA moves, axis reversal,
//!   ramped jogging
//! - Equatorial/horizontal coordinate transformation from reference stars
//! - Mount state machine
//! - Configuration types and the calibration record

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod coords;
pub mod motion;
pub mod state;
pub mod traits;
