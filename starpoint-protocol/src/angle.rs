//! Wire units for right ascension and declination
//!
//! Right ascension covers a full turn with the whole `u32` range, so
//! `0x8000_0000` is 12 h. Declination is a signed `i32` where
//! `0x4000_0000` is +90°. Both therefore share the scale of
//! 2^31 units per π radians.

use core::f64::consts::{FRAC_PI_2, PI, TAU};

/// Wire units per π radians
const UNITS_PER_PI: f64 = 2_147_483_648.0;

/// Wire units in a full turn of right ascension
const UNITS_PER_TURN: u64 = 1 << 32;

/// Encode a right ascension in radians, wrapping into one turn
pub fn ra_to_wire(ra: f64) -> u32 {
    let turns = ra / TAU;
    let fraction = turns - libm::floor(turns);
    let units = libm::rint(fraction * UNITS_PER_TURN as f64) as u64;
    (units % UNITS_PER_TURN) as u32
}

/// Decode a right ascension into `[0, 2π)` radians
pub fn ra_from_wire(ra: u32) -> f64 {
    f64::from(ra) * PI / UNITS_PER_PI
}

/// Encode a declination in radians, clamped to the poles
pub fn dec_to_wire(dec: f64) -> i32 {
    let dec = dec.clamp(-FRAC_PI_2, FRAC_PI_2);
    libm::rint(dec * UNITS_PER_PI / PI) as i32
}

/// Decode a declination into radians
pub fn dec_from_wire(dec: i32) -> f64 {
    f64::from(dec) * PI / UNITS_PER_PI
}

/// Radians to hours of right ascension
pub fn radians_to_hours(rad: f64) -> f64 {
    rad * 12.0 / PI
}

/// Hours of right ascension to radians
pub fn hours_to_radians(hours: f64) -> f64 {
    hours * PI / 12.0
}
