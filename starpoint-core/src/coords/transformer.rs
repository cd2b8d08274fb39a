//! Reference-star coordinate transformer
//!
//! Fits the rotation between the equatorial and horizontal frames from
//! three stars observed in both (Taki's matrix method):
//!
//! ```text
//! H = [h1 h2 h3]      horizontal unit vectors as columns
//! E = [e1 e2 e3]      equatorial unit vectors as columns
//! T = H · E⁻¹         equatorial → horizontal
//! iT = T⁻¹            horizontal → equatorial
//! ```
//!
//! Equatorial vectors are referred to the epoch `t0` by subtracting the
//! sidereal drift from right ascension. When only two stars are known, the
//! third is taken as the normalized cross product of the first two in each
//! frame.

use core::f64::consts::TAU;

use super::matrix::Matrix3;
use super::sidereal::TimeReference;
use super::vector::Vector3;
use crate::config::CoordsConfig;

/// Allowed overshoot of |z| past 1 before a transformed vector is rejected
pub const VECTOR_TOLERANCE: f64 = 1e-9;

/// Transform errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransformError {
    /// Reference vectors are coplanar or degenerate
    SingularConfiguration,
    /// Not enough references to build a transform
    NotConfigured,
    /// A transformed vector lies outside the unit sphere
    InvalidVector,
}

/// Reference star slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReferenceSlot {
    First,
    Second,
    /// Set by observation or derived from the first two
    Third,
}

impl ReferenceSlot {
    /// Slot from its 1-based number
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
            Self::Third => 2,
        }
    }
}

/// Equatorial direction (radians)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Equatorial {
    /// Right ascension
    pub ra: f64,
    /// Declination
    pub dec: f64,
}

impl Equatorial {
    pub const fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }
}

/// Horizontal direction (radians)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Horizontal {
    pub azimuth: f64,
    pub altitude: f64,
}

impl Horizontal {
    pub const fn new(azimuth: f64, altitude: f64) -> Self {
        Self { azimuth, altitude }
    }
}

/// One star as unit vectors in both frames
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReferenceStar {
    /// Equatorial vector referred to the epoch
    pub equatorial: Vector3,
    /// Horizontal vector as observed
    pub horizontal: Vector3,
}

#[derive(Debug, Clone, Copy)]
struct Transform {
    forward: Matrix3,
    inverse: Matrix3,
}

/// Equatorial/horizontal converter
#[derive(Debug, Clone)]
pub struct CoordinateTransformer {
    time: TimeReference,
    references: [Option<ReferenceStar>; 3],
    third_derived: bool,
    transform: Option<Transform>,
}

impl Default for CoordinateTransformer {
    fn default() -> Self {
        Self::new(&CoordsConfig::default())
    }
}

impl CoordinateTransformer {
    /// Create an unconfigured transformer with epoch 0
    pub fn new(config: &CoordsConfig) -> Self {
        Self {
            time: TimeReference::new(0.0, config.sidereal_rate),
            references: [None; 3],
            third_derived: false,
            transform: None,
        }
    }

    /// Set the time origin `t0` in seconds
    ///
    /// References already stored keep the drift correction they were
    /// recorded with, so the epoch should be set before observing.
    pub fn set_epoch(&mut self, epoch: f64) {
        self.time.set_epoch(epoch);
    }

    pub fn time_reference(&self) -> &TimeReference {
        &self.time
    }

    /// Whether a transform is available
    pub fn is_configured(&self) -> bool {
        self.transform.is_some()
    }

    pub fn reference(&self, slot: ReferenceSlot) -> Option<&ReferenceStar> {
        self.references[slot.index()].as_ref()
    }

    /// Whether the third reference was derived rather than observed
    pub fn is_third_derived(&self) -> bool {
        self.third_derived && self.references[2].is_some()
    }

    /// Forward (equatorial → horizontal) matrix
    pub fn forward_matrix(&self) -> Option<Matrix3> {
        self.transform.map(|t| t.forward)
    }

    /// Inverse (horizontal → equatorial) matrix
    pub fn inverse_matrix(&self) -> Option<Matrix3> {
        self.transform.map(|t| t.inverse)
    }

    /// Build the reference vectors for an observation at `time`
    pub fn observe(
        &self,
        equatorial: Equatorial,
        time: f64,
        horizontal: Horizontal,
    ) -> ReferenceStar {
        ReferenceStar {
            equatorial: self.equatorial_vector(equatorial, time),
            horizontal: Vector3::from_spherical(horizontal.azimuth, horizontal.altitude),
        }
    }

    /// Record a star seen at `horizontal` when its position was `equatorial`
    ///
    /// Recomputes the transform once all three slots are filled.
    pub fn set_reference(
        &mut self,
        slot: ReferenceSlot,
        equatorial: Equatorial,
        time: f64,
        horizontal: Horizontal,
    ) -> Result<(), TransformError> {
        let star = self.observe(equatorial, time, horizontal);
        self.set_reference_star(slot, star)
    }

    /// Store precomputed reference vectors in a slot
    pub fn set_reference_star(
        &mut self,
        slot: ReferenceSlot,
        star: ReferenceStar,
    ) -> Result<(), TransformError> {
        debug!("Reference {} set", slot);
        self.references[slot.index()] = Some(star);

        match slot {
            ReferenceSlot::Third => self.third_derived = false,
            _ if self.third_derived => {
                // Derived from the old pair, no longer valid
                self.references[2] = None;
                self.third_derived = false;
            }
            _ => {}
        }

        self.transform = None;
        if self.references.iter().all(Option::is_some) {
            self.compute_transform()?;
        }
        Ok(())
    }

    /// Forget all references
    pub fn clear(&mut self) {
        self.references = [None; 3];
        self.third_derived = false;
        self.transform = None;
    }

    /// Derive the third reference from the first two
    pub fn derive_third_reference(&mut self) -> Result<(), TransformError> {
        let (first, second) = match (self.references[0], self.references[1]) {
            (Some(first), Some(second)) => (first, second),
            _ => return Err(TransformError::NotConfigured),
        };

        let equatorial = first.equatorial.cross(&second.equatorial).normalize();
        let horizontal = first.horizontal.cross(&second.horizontal).normalize();
        let (Some(equatorial), Some(horizontal)) = (equatorial, horizontal) else {
            warn!("First two references are parallel");
            return Err(TransformError::SingularConfiguration);
        };

        self.references[2] = Some(ReferenceStar {
            equatorial,
            horizontal,
        });
        self.third_derived = true;
        self.compute_transform()
    }

    /// Fit the transform to the three references
    pub fn compute_transform(&mut self) -> Result<(), TransformError> {
        self.transform = None;
        let [Some(a), Some(b), Some(c)] = self.references else {
            return Err(TransformError::NotConfigured);
        };

        let h = Matrix3::from_columns(a.horizontal, b.horizontal, c.horizontal);
        let e = Matrix3::from_columns(a.equatorial, b.equatorial, c.equatorial);

        let forward = e.inverse().map(|e_inv| h * e_inv);
        let Some((forward, inverse)) = forward.and_then(|t| t.inverse().map(|it| (t, it))) else {
            warn!("Reference stars are coplanar");
            return Err(TransformError::SingularConfiguration);
        };

        debug!("Transform determinant {}", forward.determinant());
        self.transform = Some(Transform { forward, inverse });
        Ok(())
    }

    /// Convert an equatorial direction at `time` to horizontal
    ///
    /// Azimuth is returned in `[0, 2π)`.
    pub fn to_horizontal(
        &mut self,
        equatorial: Equatorial,
        time: f64,
    ) -> Result<Horizontal, TransformError> {
        let transform = self.ensure_transform()?;
        let v = transform.forward.apply(self.equatorial_vector(equatorial, time));
        let (azimuth, altitude) = direction_angles(v)?;
        Ok(Horizontal::new(normalize_angle(azimuth), altitude))
    }

    /// Convert a horizontal direction at `time` to equatorial
    ///
    /// Right ascension is returned in `[0, 2π)`.
    pub fn to_equatorial(
        &mut self,
        horizontal: Horizontal,
        time: f64,
    ) -> Result<Equatorial, TransformError> {
        let transform = self.ensure_transform()?;
        let v = transform
            .inverse
            .apply(Vector3::from_spherical(horizontal.azimuth, horizontal.altitude));
        let (ra, dec) = direction_angles(v)?;
        Ok(Equatorial::new(
            normalize_angle(ra + self.time.drift(time)),
            dec,
        ))
    }

    fn ensure_transform(&mut self) -> Result<Transform, TransformError> {
        if self.references[2].is_none() {
            self.derive_third_reference()?;
        }
        if self.transform.is_none() {
            self.compute_transform()?;
        }
        self.transform.ok_or(TransformError::NotConfigured)
    }

    fn equatorial_vector(&self, equatorial: Equatorial, time: f64) -> Vector3 {
        Vector3::from_spherical(equatorial.ra - self.time.drift(time), equatorial.dec)
    }
}

/// Longitude and latitude of a transformed vector
fn direction_angles(v: Vector3) -> Result<(f64, f64), TransformError> {
    if !v.is_finite() || libm::fabs(v.z) > 1.0 + VECTOR_TOLERANCE {
        return Err(TransformError::InvalidVector);
    }
    let z = v.z.clamp(-1.0, 1.0);
    Ok((libm::atan2(v.y, v.x), libm::asin(z)))
}

/// Wrap an angle into `[0, 2π)`
fn normalize_angle(angle: f64) -> f64 {
    let wrapped = libm::fmod(angle, TAU);
    let wrapped = if wrapped < 0.0 { wrapped + TAU } else { wrapped };
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
