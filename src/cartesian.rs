//! Unit-sphere vector math: spherical ↔ cartesian conversion and the small set
//! of vector operations the rotation, circle and clip code needs.

use std::ops::{Add, Mul, Sub};

use crate::math::{asin, EPSILON};

/// A point on (or near) the unit sphere in Euclidean coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CartesianVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianVector {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Spherical (lambda, phi) in radians to a unit vector.
    ///
    /// x = cos φ·cos λ, y = cos φ·sin λ, z = sin φ
    pub fn from_spherical(lambda: f64, phi: f64) -> Self {
        let cos_phi = phi.cos();
        Self {
            x: cos_phi * lambda.cos(),
            y: cos_phi * lambda.sin(),
            z: phi.sin(),
        }
    }

    /// Back to (lambda, phi) in radians: λ = atan2(y, x), φ = asin(z).
    pub fn to_spherical(self) -> (f64, f64) {
        (self.y.atan2(self.x), asin(self.z))
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn magnitude(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Scale to unit length.
    ///
    /// Vectors shorter than [`EPSILON`] have no meaningful direction; they come
    /// back as the zero vector instead of being blown up to NaN or infinity.
    pub fn normalize(self) -> Self {
        let length = self.magnitude();
        if length < EPSILON {
            tracing::trace!(length, "normalize of a degenerate vector");
            return Self::default();
        }
        self * (1.0 / length)
    }
}

impl Add for CartesianVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for CartesianVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for CartesianVector {
    type Output = Self;

    fn mul(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }
}
