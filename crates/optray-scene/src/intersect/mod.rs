//! Ray-surface intersection algorithms.
//!
//! Each analytic surface type has a dedicated intersector that computes
//! exact intersection points and the surface parameters needed for
//! normal evaluation at the hit.

mod cylinder;
mod plane;
mod sphere;

pub use cylinder::intersect_cylinder;
pub use plane::intersect_plane;
pub use sphere::intersect_sphere;

use optray_geom::{CylinderSurface, Plane, SphereSurface, Surface, SurfaceKind};
use optray_math::Point2;
use optray_trace::Ray;

/// Result of a ray-surface intersection, before scene bookkeeping.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit {
    /// Parameter along the ray.
    pub t: f64,
    /// Surface parameter coordinates (u, v).
    pub uv: Point2,
}

/// Intersect a ray with a surface, returning all intersections sorted by t.
///
/// Dispatches to the appropriate intersector based on surface kind.
pub fn intersect_surface(ray: &Ray, surface: &dyn Surface) -> Vec<SurfaceHit> {
    match surface.surface_type() {
        SurfaceKind::Plane => {
            if let Some(plane) = surface.as_any().downcast_ref::<Plane>() {
                intersect_plane(ray, plane).into_iter().collect()
            } else {
                Vec::new()
            }
        }
        SurfaceKind::Sphere => {
            if let Some(sphere) = surface.as_any().downcast_ref::<SphereSurface>() {
                intersect_sphere(ray, sphere)
            } else {
                Vec::new()
            }
        }
        SurfaceKind::Cylinder => {
            if let Some(cylinder) = surface.as_any().downcast_ref::<CylinderSurface>() {
                intersect_cylinder(ray, cylinder)
            } else {
                Vec::new()
            }
        }
    }
}

/// Solve `a·t² + b·t + c = 0`, returning the roots in ascending order.
///
/// `None` when the discriminant is negative. Callers reject `a ≈ 0`
/// before solving.
pub(crate) fn solve_quadratic(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_disc = discriminant.sqrt();
    Some(((-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)))
}
