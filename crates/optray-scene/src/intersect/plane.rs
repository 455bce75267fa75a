//! Ray-plane intersection (closed-form).

use super::SurfaceHit;
use optray_geom::Plane;
use optray_trace::Ray;

/// Intersect a ray with a plane.
///
/// Returns `Some(hit)` if the ray strikes the plane at a non-negative t,
/// or `None` if the ray is parallel to the plane or the intersection
/// lies behind the origin.
pub fn intersect_plane(ray: &Ray, plane: &Plane) -> Option<SurfaceHit> {
    let normal = plane.normal_dir.as_ref();
    let denom = ray.direction.as_ref().dot(normal);

    // Ray is parallel to plane
    if denom.abs() < 1e-12 {
        return None;
    }

    let t = (plane.origin - ray.origin).dot(normal) / denom;
    if t < 0.0 {
        return None;
    }

    // UV by projecting the intersection point into the plane frame
    let uv = plane.project(&ray.at(t));

    Some(SurfaceHit { t, uv })
}
