//! Coordinate transformation
//!
//! Converts between equatorial (right ascension/declination) and horizontal
//! (azimuth/altitude) directions using a matrix fitted to reference stars
//! observed in both frames.

pub mod matrix;
pub mod sidereal;
pub mod transformer;
pub mod vector;

pub use matrix::Matrix3;
pub use sidereal::TimeReference;
pub use transformer::{
    CoordinateTransformer, Equatorial, Horizontal, ReferenceSlot, ReferenceStar, TransformError,
};
pub use vector::Vector3;
