#![warn(missing_docs)]

//! Math types for the optray ray tracer.
//!
//! Thin wrappers around nalgebra providing domain-specific types for
//! optical geometry (points, vectors, directions), plus tolerance
//! constants and the two vector-optics formulas (mirror reflection and
//! vector-form Snell refraction) that the tracer orchestrates.

use nalgebra::{Unit, Vector2, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in 2D parameter space.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// Mirror-reflect a direction about a surface normal.
///
/// `normal` must face the incoming ray (`direction.dot(normal) <= 0`);
/// the result has the same length as `direction`.
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(&normal) * normal
}

/// Refract a direction through an interface using vector-form Snell's law.
///
/// `eta` is the ratio `n1 / n2` of the refractive indices on the incoming
/// and outgoing sides, and `normal` must face the incoming ray. Returns
/// `None` when the critical-angle radical is negative, i.e. total internal
/// reflection: refraction has no real solution.
pub fn refract(direction: Vec3, normal: Vec3, eta: f64) -> Option<Vec3> {
    let cos_i = (-direction).dot(&normal).clamp(-1.0, 1.0);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        None
    } else {
        Some(eta * direction + (eta * cos_i - k.sqrt()) * normal)
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in model units.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default tracing tolerances (1e-6 linear, 1e-9 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        angular: 1e-9,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }

    /// Check if two unit directions are the same (not merely parallel).
    ///
    /// Compares via the cross-product norm rather than `acos`, which is
    /// ill-conditioned near zero angle.
    pub fn directions_equal(&self, a: &Dir3, b: &Dir3) -> bool {
        a.dot(b) > 0.0 && a.cross(b).norm() < self.angular.max(1e-12)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
