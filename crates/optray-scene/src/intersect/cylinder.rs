//! Ray-cylinder intersection (quadratic equation).

use super::{solve_quadratic, SurfaceHit};
use optray_geom::CylinderSurface;
use optray_math::{Point2, Point3};
use optray_trace::Ray;
use std::f64::consts::PI;

/// Intersect a ray with an infinite cylindrical surface.
///
/// Returns up to 2 intersections (entry and exit points), sorted by t.
/// Only intersections with t >= 0 are returned; rays parallel to the
/// axis never intersect the (infinite) wall.
pub fn intersect_cylinder(ray: &Ray, cylinder: &CylinderSurface) -> Vec<SurfaceHit> {
    let axis = cylinder.axis.as_ref();
    let d = ray.direction.as_ref();
    let oc = ray.origin - cylinder.center;

    // Project direction and origin offset onto the plane perpendicular
    // to the axis: |oc_perp + t*d_perp|^2 = r^2
    let d_perp = d - d.dot(axis) * axis;
    let oc_perp = oc - oc.dot(axis) * axis;

    let a = d_perp.dot(&d_perp);
    if a.abs() < 1e-12 {
        return Vec::new();
    }
    let b = 2.0 * oc_perp.dot(&d_perp);
    let c = oc_perp.dot(&oc_perp) - cylinder.radius * cylinder.radius;

    let Some((t1, t2)) = solve_quadratic(a, b, c) else {
        return Vec::new();
    };

    [t1, t2]
        .into_iter()
        .filter(|&t| t >= 0.0)
        .map(|t| SurfaceHit {
            t,
            uv: cylinder_uv(cylinder, &ray.at(t)),
        })
        .collect()
}

/// Compute the (u, v) surface parameters for a point on a cylinder.
fn cylinder_uv(cylinder: &CylinderSurface, point: &Point3) -> Point2 {
    let axis = cylinder.axis.as_ref();
    let ref_dir = cylinder.ref_dir.as_ref();
    let y_dir = axis.cross(ref_dir);

    let to_point = point - cylinder.center;

    // v = height along axis
    let v = to_point.dot(axis);

    // Angle from ref_dir in the perpendicular plane
    let proj = to_point - v * axis;
    let x = proj.dot(ref_dir);
    let y = proj.dot(&y_dir);
    let u = y.atan2(x);
    let u = if u < 0.0 { u + 2.0 * PI } else { u };

    Point2::new(u, v)
}
