#![warn(missing_docs)]

//! Analytic surface types for the optray tracer.
//!
//! Provides a trait-based abstraction for parametric surfaces with
//! concrete implementations for the analytic types optical test scenes
//! are built from: planes, spheres, and cylinders.
//!
//! Normals are derived from the parametric derivatives (`d_du × d_dv`),
//! so normal evaluation is fallible: at parametric singularities such as
//! a sphere pole the cross product vanishes and [`Surface::normal`]
//! returns `None`. Callers recover by re-evaluating at a nudged
//! parameter.

use std::any::Any;
use std::f64::consts::PI;
use optray_math::{Dir3, Point2, Point3, Vec3};

/// Cross products shorter than this cannot be normalized into a normal.
const MIN_NORMAL_NORM: f64 = 1e-9;

// =============================================================================
// Surface trait
// =============================================================================

/// The kind of a surface (for match-based dispatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Infinite plane.
    Plane,
    /// Spherical surface.
    Sphere,
    /// Cylindrical surface (infinite extent along axis).
    Cylinder,
}

/// A parametric surface in 3D space.
pub trait Surface: Send + Sync + std::fmt::Debug {
    /// Evaluate the surface at parameter `(u, v)` to get a 3D point.
    fn evaluate(&self, uv: Point2) -> Point3;

    /// Partial derivative with respect to u at `(u, v)`.
    fn d_du(&self, uv: Point2) -> Vec3;

    /// Partial derivative with respect to v at `(u, v)`.
    fn d_dv(&self, uv: Point2) -> Vec3;

    /// Outward surface normal at `(u, v)`, from `d_du × d_dv`.
    ///
    /// `None` when the parameterization is degenerate at `(u, v)` and no
    /// normal can be derived there.
    fn normal(&self, uv: Point2) -> Option<Dir3> {
        Dir3::try_new(self.d_du(uv).cross(&self.d_dv(uv)), MIN_NORMAL_NORM)
    }

    /// Parameter domain as `((u_min, u_max), (v_min, v_max))`.
    fn domain(&self) -> ((f64, f64), (f64, f64));

    /// The kind of this surface.
    fn surface_type(&self) -> SurfaceKind;

    /// Clone this surface into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Surface>;

    /// Downcast to a concrete type via `Any`.
    fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn Surface> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

// =============================================================================
// Plane
// =============================================================================

/// An infinite plane defined by an origin point and a coordinate frame.
///
/// Parameterization: `P(u, v) = origin + u * x_dir + v * y_dir`
#[derive(Debug, Clone)]
pub struct Plane {
    /// Origin point on the plane.
    pub origin: Point3,
    /// Unit vector along the u direction.
    pub x_dir: Dir3,
    /// Unit vector along the v direction.
    pub y_dir: Dir3,
    /// Unit normal (x_dir × y_dir).
    pub normal_dir: Dir3,
}

impl Plane {
    /// Create a plane from origin and two orthogonal direction vectors.
    /// The vectors do not need to be normalized.
    pub fn new(origin: Point3, x_dir: Vec3, y_dir: Vec3) -> Self {
        let x = Dir3::new_normalize(x_dir);
        let y = Dir3::new_normalize(y_dir);
        let n = Dir3::new_normalize(x_dir.cross(&y_dir));
        Self {
            origin,
            x_dir: x,
            y_dir: y,
            normal_dir: n,
        }
    }

    /// Create a plane from origin and normal. X/Y directions are chosen arbitrarily.
    pub fn from_normal(origin: Point3, normal: Vec3) -> Self {
        let n = Dir3::new_normalize(normal);
        // Pick an arbitrary perpendicular vector
        let arbitrary = if n.as_ref().x.abs() < 0.9 {
            Vec3::x()
        } else {
            Vec3::y()
        };
        let x = Dir3::new_normalize(arbitrary.cross(n.as_ref()));
        let y = Dir3::new_normalize(n.as_ref().cross(x.as_ref()));
        Self {
            origin,
            x_dir: x,
            y_dir: y,
            normal_dir: n,
        }
    }

    /// XY plane at the origin.
    pub fn xy() -> Self {
        Self::new(Point3::origin(), Vec3::x(), Vec3::y())
    }

    /// Project a 3D point onto this plane's (u, v) parameter space.
    pub fn project(&self, p: &Point3) -> Point2 {
        let d = p - self.origin;
        Point2::new(d.dot(self.x_dir.as_ref()), d.dot(self.y_dir.as_ref()))
    }

    /// Signed distance from a point to this plane.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(self.normal_dir.as_ref())
    }
}

impl Surface for Plane {
    fn evaluate(&self, uv: Point2) -> Point3 {
        self.origin + uv.x * self.x_dir.as_ref() + uv.y * self.y_dir.as_ref()
    }

    fn d_du(&self, _uv: Point2) -> Vec3 {
        *self.x_dir.as_ref()
    }

    fn d_dv(&self, _uv: Point2) -> Vec3 {
        *self.y_dir.as_ref()
    }

    fn normal(&self, _uv: Point2) -> Option<Dir3> {
        Some(self.normal_dir)
    }

    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        ((-1e10, 1e10), (-1e10, 1e10))
    }

    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::Plane
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Sphere
// =============================================================================

/// A spherical surface defined by center, radius, and an orientation frame.
///
/// Parameterization:
/// `P(u, v) = center + radius * (cos(v) * (cos(u) * ref_dir + sin(u) * y_dir) + sin(v) * axis)`
///
/// Where `u ∈ [0, 2π)` is longitude and `v ∈ [-π/2, π/2]` is latitude.
/// The parameterization degenerates at the poles (`v = ±π/2`).
#[derive(Debug, Clone)]
pub struct SphereSurface {
    /// Center of the sphere.
    pub center: Point3,
    /// Radius of the sphere.
    pub radius: f64,
    /// Reference direction for u=0 (perpendicular to axis).
    pub ref_dir: Dir3,
    /// Axis direction (north pole).
    pub axis: Dir3,
}

impl SphereSurface {
    /// Create a sphere centered at origin with the given radius.
    pub fn new(radius: f64) -> Self {
        Self {
            center: Point3::origin(),
            radius,
            ref_dir: Dir3::new_normalize(Vec3::x()),
            axis: Dir3::new_normalize(Vec3::z()),
        }
    }

    /// Create a sphere with a custom center.
    pub fn with_center(center: Point3, radius: f64) -> Self {
        Self {
            center,
            radius,
            ref_dir: Dir3::new_normalize(Vec3::x()),
            axis: Dir3::new_normalize(Vec3::z()),
        }
    }

    fn y_dir(&self) -> Vec3 {
        self.axis.as_ref().cross(self.ref_dir.as_ref())
    }
}

impl Surface for SphereSurface {
    fn evaluate(&self, uv: Point2) -> Point3 {
        let (sin_u, cos_u) = uv.x.sin_cos();
        let (sin_v, cos_v) = uv.y.sin_cos();
        self.center
            + self.radius
                * (cos_v * (cos_u * self.ref_dir.as_ref() + sin_u * self.y_dir())
                    + sin_v * self.axis.as_ref())
    }

    fn d_du(&self, uv: Point2) -> Vec3 {
        let (sin_u, cos_u) = uv.x.sin_cos();
        let cos_v = uv.y.cos();
        self.radius * cos_v * (-sin_u * self.ref_dir.as_ref() + cos_u * self.y_dir())
    }

    fn d_dv(&self, uv: Point2) -> Vec3 {
        let (sin_u, cos_u) = uv.x.sin_cos();
        let (sin_v, cos_v) = uv.y.sin_cos();
        self.radius
            * (-sin_v * (cos_u * self.ref_dir.as_ref() + sin_u * self.y_dir())
                + cos_v * self.axis.as_ref())
    }

    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        ((0.0, 2.0 * PI), (-PI / 2.0, PI / 2.0))
    }

    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::Sphere
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// Cylinder
// =============================================================================

/// A cylindrical surface defined by an axis line and radius.
///
/// Parameterization: `P(u, v) = center + radius * (cos(u) * ref_dir + sin(u) * y_dir) + v * axis`
///
/// Where `u ∈ [0, 2π)` is the angular parameter and `v` is the height along the axis.
#[derive(Debug, Clone)]
pub struct CylinderSurface {
    /// Center point at the base of the cylinder axis.
    pub center: Point3,
    /// Unit direction along the cylinder axis.
    pub axis: Dir3,
    /// Reference direction for u=0 (perpendicular to axis).
    pub ref_dir: Dir3,
    /// Radius of the cylinder.
    pub radius: f64,
}

impl CylinderSurface {
    /// Create a cylinder with axis along Z, centered at origin.
    pub fn new(radius: f64) -> Self {
        Self {
            center: Point3::origin(),
            axis: Dir3::new_normalize(Vec3::z()),
            ref_dir: Dir3::new_normalize(Vec3::x()),
            radius,
        }
    }

    /// Create a cylinder with a custom center and axis.
    pub fn with_axis(center: Point3, axis: Vec3, radius: f64) -> Self {
        let a = Dir3::new_normalize(axis);
        let arbitrary = if a.as_ref().x.abs() < 0.9 {
            Vec3::x()
        } else {
            Vec3::y()
        };
        let ref_dir = Dir3::new_normalize(arbitrary - arbitrary.dot(a.as_ref()) * a.as_ref());
        Self {
            center,
            axis: a,
            ref_dir,
            radius,
        }
    }

    fn y_dir(&self) -> Vec3 {
        self.axis.as_ref().cross(self.ref_dir.as_ref())
    }
}

impl Surface for CylinderSurface {
    fn evaluate(&self, uv: Point2) -> Point3 {
        let (sin_u, cos_u) = uv.x.sin_cos();
        self.center
            + self.radius * (cos_u * self.ref_dir.as_ref() + sin_u * self.y_dir())
            + uv.y * self.axis.as_ref()
    }

    fn d_du(&self, uv: Point2) -> Vec3 {
        let (sin_u, cos_u) = uv.x.sin_cos();
        self.radius * (-sin_u * self.ref_dir.as_ref() + cos_u * self.y_dir())
    }

    fn d_dv(&self, _uv: Point2) -> Vec3 {
        *self.axis.as_ref()
    }

    fn domain(&self) -> ((f64, f64), (f64, f64)) {
        ((0.0, 2.0 * PI), (-1e10, 1e10))
    }

    fn surface_type(&self) -> SurfaceKind {
        SurfaceKind::Cylinder
    }

    fn clone_box(&self) -> Box<dyn Surface> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_plane_evaluate_and_project() {
        let plane = Plane::xy();
        let p = plane.evaluate(Point2::new(3.0, 4.0));
        assert_relative_eq!(p.x, 3.0);
        assert_relative_eq!(p.y, 4.0);
        assert_relative_eq!(p.z, 0.0);

        let uv = plane.project(&Point3::new(3.0, 4.0, 7.0));
        assert_relative_eq!(uv.x, 3.0);
        assert_relative_eq!(uv.y, 4.0);
    }

    #[test]
    fn test_plane_normal_never_degenerate() {
        let plane = Plane::from_normal(Point3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let n = plane.normal(Point2::new(1e9, -1e9)).unwrap();
        assert_relative_eq!(n.as_ref().z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_plane_signed_distance() {
        let plane = Plane::xy();
        assert_relative_eq!(plane.signed_distance(&Point3::new(4.0, 5.0, 2.0)), 2.0);
        assert_relative_eq!(plane.signed_distance(&Point3::new(0.0, 0.0, -3.0)), -3.0);
    }

    #[test]
    fn test_plane_frame_is_right_handed() {
        let plane = Plane::from_normal(Point3::origin(), Vec3::new(1.0, 2.0, 3.0));
        let cross = plane.x_dir.as_ref().cross(plane.y_dir.as_ref());
        assert_relative_eq!((cross - plane.normal_dir.as_ref()).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sphere_evaluate_equator() {
        let s = SphereSurface::new(5.0);
        let p = s.evaluate(Point2::new(0.0, 0.0));
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-12);

        let p = s.evaluate(Point2::new(FRAC_PI_2, 0.0));
        assert_relative_eq!(p.y, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sphere_normal_is_radial() {
        let s = SphereSurface::with_center(Point3::new(1.0, 2.0, 3.0), 2.0);
        let uv = Point2::new(0.7, 0.3);
        let n = s.normal(uv).unwrap();
        let radial = (s.evaluate(uv) - s.center).normalize();
        assert_relative_eq!((n.as_ref() - radial).norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sphere_normal_degenerate_at_pole() {
        let s = SphereSurface::new(5.0);
        // d_du vanishes at the poles, so the derived normal does not exist.
        assert!(s.normal(Point2::new(0.0, FRAC_PI_2)).is_none());
        assert!(s.normal(Point2::new(1.0, -FRAC_PI_2)).is_none());
        // Just off the pole it exists again.
        assert!(s.normal(Point2::new(0.0, FRAC_PI_2 - 1e-4)).is_some());
    }

    #[test]
    fn test_sphere_domain() {
        let s = SphereSurface::new(1.0);
        let ((u0, u1), (v0, v1)) = s.domain();
        assert_relative_eq!(u0, 0.0);
        assert_relative_eq!(u1, 2.0 * PI);
        assert_relative_eq!(v0, -FRAC_PI_2);
        assert_relative_eq!(v1, FRAC_PI_2);
    }

    #[test]
    fn test_cylinder_normal_is_radial() {
        let c = CylinderSurface::new(3.0);
        let n = c.normal(Point2::new(0.0, 5.0)).unwrap();
        assert_relative_eq!(n.as_ref().x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(n.as_ref().z, 0.0, epsilon = 1e-12);

        let n = c.normal(Point2::new(PI, -2.0)).unwrap();
        assert_relative_eq!(n.as_ref().x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cylinder_with_axis_evaluate() {
        let c = CylinderSurface::with_axis(Point3::new(0.0, 0.0, 1.0), Vec3::y(), 2.0);
        let p = c.evaluate(Point2::new(0.0, 3.0));
        // ref_dir is perpendicular to the Y axis; the point sits on the
        // radius-2 circle offset 3 along the axis.
        assert_relative_eq!((p - c.center - 3.0 * c.axis.as_ref()).norm(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_outward_convention_matches_derivatives() {
        let s = SphereSurface::new(2.0);
        let uv = Point2::new(0.3, 0.4);
        let derived = s.d_du(uv).cross(&s.d_dv(uv)).normalize();
        let n = s.normal(uv).unwrap();
        assert_relative_eq!((derived - *n.as_ref()).norm(), 0.0, epsilon = 1e-9);
    }
}
