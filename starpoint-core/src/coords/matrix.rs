//! 3×3 matrices
//!
//! Stored row-major. Inversion uses the closed-form adjugate so a singular
//! matrix is detected from its determinant rather than producing garbage.

use core::ops::Mul;

use super::vector::Vector3;

/// Determinant magnitude below which a matrix is treated as singular
pub const SINGULAR_EPSILON: f64 = 1e-9;

/// A 3×3 matrix
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Matrix3 {
    m: [[f64; 3]; 3],
}

impl Matrix3 {
    pub const fn from_rows(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    pub const fn identity() -> Self {
        Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Build a matrix whose columns are the given vectors
    pub fn from_columns(a: Vector3, b: Vector3, c: Vector3) -> Self {
        Self::from_rows([[a.x, b.x, c.x], [a.y, b.y, c.y], [a.z, b.z, c.z]])
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row][col]
    }

    pub fn rows(&self) -> [[f64; 3]; 3] {
        self.m
    }

    pub fn transpose(&self) -> Self {
        let m = &self.m;
        Self::from_rows([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Invert via adjugate and determinant
    ///
    /// Returns `None` when the determinant is within [`SINGULAR_EPSILON`] of
    /// zero or not finite.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || libm::fabs(det) < SINGULAR_EPSILON {
            return None;
        }

        let m = &self.m;
        let adjugate = [
            [
                m[1][1] * m[2][2] - m[1][2] * m[2][1],
                m[0][2] * m[2][1] - m[0][1] * m[2][2],
                m[0][1] * m[1][2] - m[0][2] * m[1][1],
            ],
            [
                m[1][2] * m[2][0] - m[1][0] * m[2][2],
                m[0][0] * m[2][2] - m[0][2] * m[2][0],
                m[0][2] * m[1][0] - m[0][0] * m[1][2],
            ],
            [
                m[1][0] * m[2][1] - m[1][1] * m[2][0],
                m[0][1] * m[2][0] - m[0][0] * m[2][1],
                m[0][0] * m[1][1] - m[0][1] * m[1][0],
            ],
        ];

        let mut inverse = [[0.0; 3]; 3];
        for (row, adj_row) in inverse.iter_mut().zip(adjugate.iter()) {
            for (value, adj) in row.iter_mut().zip(adj_row.iter()) {
                *value = adj / det;
            }
        }
        Some(Self::from_rows(inverse))
    }

    pub fn multiply(&self, other: &Self) -> Self {
        let mut result = [[0.0; 3]; 3];
        for (i, row) in result.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = (0..3).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        Self::from_rows(result)
    }

    pub fn apply(&self, v: Vector3) -> Vector3 {
        let v = v.to_array();
        Vector3::from_array(self.m.map(|row| row[0] * v[0] + row[1] * v[1] + row[2] * v[2]))
    }

    /// Largest absolute element-wise difference
    pub fn max_difference(&self, other: &Self) -> f64 {
        let mut max: f64 = 0.0;
        for (row, other_row) in self.m.iter().zip(other.m.iter()) {
            for (a, b) in row.iter().zip(other_row.iter()) {
                max = max.max(libm::fabs(a - b));
            }
        }
        max
    }

    /// Check `M · Mᵀ ≈ I` within `tolerance`
    pub fn is_orthogonal(&self, tolerance: f64) -> bool {
        self.multiply(&self.transpose())
            .max_difference(&Self::identity())
            <= tolerance
    }
}

impl Mul for Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: Matrix3) -> Matrix3 {
        self.multiply(&rhs)
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Vector3 {
        self.apply(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotation_z(angle: f64) -> Matrix3 {
        let (s, c) = (angle.sin(), angle.cos());
        Matrix3::from_rows([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    #[test]
    fn test_identity_inverse() {
        let inverse = Matrix3::identity().inverse().unwrap();
        assert_eq!(inverse, Matrix3::identity());
    }

    #[test]
    fn test_inverse_of_general_matrix() {
        let m = Matrix3::from_rows([[2.0, 0.0, 1.0], [1.0, 3.0, 2.0], [1.0, 1.0, 2.0]]);
        assert!((m.determinant() - 6.0).abs() < 1e-12);
        let product = m * m.inverse().unwrap();
        assert!(product.max_difference(&Matrix3::identity()) < 1e-12);
    }

    #[test]
    fn test_singular_matrix_has_no_inverse() {
        let v = Vector3::new(0.3, 0.4, 0.5);
        assert!(Matrix3::from_columns(v, v, v).inverse().is_none());

        let coplanar = Matrix3::from_columns(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.6, 0.8, 0.0),
        );
        assert!(coplanar.inverse().is_none());
    }

    #[test]
    fn test_rotation_is_orthogonal() {
        let r = rotation_z(0.7);
        assert!(r.is_orthogonal(1e-12));
        assert!(r.inverse().unwrap().max_difference(&r.transpose()) < 1e-12);
        assert!(!Matrix3::from_rows([[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
            .is_orthogonal(1e-6));
    }

    #[test]
    fn test_from_columns_and_apply() {
        let m = Matrix3::from_columns(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
            Vector3::new(7.0, 8.0, 9.0),
        );
        assert_eq!(m.get(0, 1), 4.0);
        assert_eq!(m.get(2, 0), 3.0);
        assert_eq!(m * Vector3::new(0.0, 1.0, 0.0), Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(m.transpose().rows()[1], [4.0, 5.0, 6.0]);
    }
}
