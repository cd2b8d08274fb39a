//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in starpoint-core on top of the starpoint-hal pin traits:
//!
//! - Mount driver (step/direction/enable lines and four limit sensors)
//! - Pointing laser output

#![no_std]
#![deny(unsafe_code)]

pub mod laser;
pub mod mount;
