//! Ray representation and intersection results.

use crate::oracle::SurfaceId;
use optray_math::{Dir3, Point2, Point3, Vec3};

/// A ray in 3D space defined by origin and direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Unit direction of the ray.
    pub direction: Dir3,
}

impl Ray {
    /// Directions shorter than this cannot be normalized.
    pub const MIN_DIRECTION_NORM: f64 = 1e-12;

    /// Create a new ray from origin and direction.
    ///
    /// The direction is normalized; returns `None` when its length is too
    /// close to zero to normalize.
    pub fn new(origin: Point3, direction: Vec3) -> Option<Self> {
        Dir3::try_new(direction, Self::MIN_DIRECTION_NORM)
            .map(|direction| Self { origin, direction })
    }

    /// Create a ray from an already-normalized direction.
    pub fn from_unit(origin: Point3, direction: Dir3) -> Self {
        Self { origin, direction }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction.as_ref()
    }
}

/// Result of a ray-scene intersection.
///
/// Carries the hit point, the identity of the struck surface, and the
/// surface parameter at the hit; the normal is evaluated separately
/// through the oracle, at that parameter.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Parameter along the ray where the intersection occurs.
    pub t: f64,
    /// 3D intersection point.
    pub point: Point3,
    /// Identity of the surface that was hit.
    pub surface: SurfaceId,
    /// Surface parameter coordinates (u, v) at the intersection.
    pub uv: Point2,
}

impl RayHit {
    /// Create a new ray hit.
    pub fn new(t: f64, point: Point3, surface: SurfaceId, uv: Point2) -> Self {
        Self {
            t,
            point,
            surface,
            uv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let p = ray.at(5.0);
        assert!((p.x - 5.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
        assert!(p.z.abs() < 1e-12);
    }

    #[test]
    fn test_ray_normalizes_direction() {
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, 10.0)).unwrap();
        assert!((ray.direction.as_ref().norm() - 1.0).abs() < 1e-12);
        let p = ray.at(2.0);
        assert!((p.z - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_ray_rejects_zero_direction() {
        assert!(Ray::new(Point3::origin(), Vec3::zeros()).is_none());
        assert!(Ray::new(Point3::origin(), Vec3::new(0.0, 1e-15, 0.0)).is_none());
    }
}
