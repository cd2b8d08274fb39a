//! Three-component direction vectors

/// A 3D Cartesian vector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// Create a vector from components
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Unit vector for a longitude-like and a latitude-like angle (radians)
    ///
    /// `(cos lat · cos lon, cos lat · sin lon, sin lat)`
    pub fn from_spherical(longitude: f64, latitude: f64) -> Self {
        let cos_lat = libm::cos(latitude);
        Self::new(
            cos_lat * libm::cos(longitude),
            cos_lat * libm::sin(longitude),
            libm::sin(latitude),
        )
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn magnitude(&self) -> f64 {
        libm::sqrt(self.dot(self))
    }

    /// Scale to unit length, or `None` for a (near) zero vector
    pub fn normalize(&self) -> Option<Self> {
        let magnitude = self.magnitude();
        if !magnitude.is_finite() || magnitude < 1e-12 {
            return None;
        }
        Some(Self::new(
            self.x / magnitude,
            self.y / magnitude,
            self.z / magnitude,
        ))
    }

    /// Check that all components are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}
