//! Ray-sphere intersection (quadratic equation).

use super::{solve_quadratic, SurfaceHit};
use optray_geom::SphereSurface;
use optray_math::{Point2, Point3};
use optray_trace::Ray;
use std::f64::consts::PI;

/// Intersect a ray with a spherical surface.
///
/// Returns up to 2 intersections (entry and exit points), sorted by t.
/// Only intersections with t >= 0 are returned.
pub fn intersect_sphere(ray: &Ray, sphere: &SphereSurface) -> Vec<SurfaceHit> {
    let oc = ray.origin - sphere.center;
    let d = ray.direction.as_ref();

    // Quadratic: |oc + t*d|^2 = r^2, with |d| = 1
    let a = d.dot(d);
    let b = 2.0 * oc.dot(d);
    let c = oc.dot(&oc) - sphere.radius * sphere.radius;

    let Some((t1, t2)) = solve_quadratic(a, b, c) else {
        return Vec::new();
    };

    [t1, t2]
        .into_iter()
        .filter(|&t| t >= 0.0)
        .map(|t| SurfaceHit {
            t,
            uv: sphere_uv(sphere, &ray.at(t)),
        })
        .collect()
}

/// Compute the (u, v) surface parameters for a point on a sphere.
///
/// u = longitude [0, 2π), v = latitude [-π/2, π/2]
fn sphere_uv(sphere: &SphereSurface, point: &Point3) -> Point2 {
    let axis = sphere.axis.as_ref();
    let ref_dir = sphere.ref_dir.as_ref();
    let y_dir = axis.cross(ref_dir);

    let to_point = (point - sphere.center) / sphere.radius;

    // v = latitude (angle from equator)
    let z = to_point.dot(axis);
    let v = z.clamp(-1.0, 1.0).asin();

    // Project onto equatorial plane for longitude
    let proj = to_point - z * axis;
    let proj_len = proj.norm();
    if proj_len < 1e-12 {
        // At a pole - longitude is undefined, use 0
        return Point2::new(0.0, v);
    }

    let x = proj.dot(ref_dir) / proj_len;
    let y = proj.dot(&y_dir) / proj_len;
    let u = y.atan2(x);
    let u = if u < 0.0 { u + 2.0 * PI } else { u };

    Point2::new(u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use optray_math::Vec3;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_through_center() {
        let sphere = SphereSurface::new(5.0);
        let ray = Ray::new(Point3::new(-10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let hits = intersect_sphere(&ray, &sphere);
        assert_eq!(hits.len(), 2);
        assert!((hits[0].t - 5.0).abs() < 1e-10);
        assert!((hits[1].t - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_miss() {
        let sphere = SphereSurface::new(5.0);
        let ray = Ray::new(Point3::new(-10.0, 10.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert!(intersect_sphere(&ray, &sphere).is_empty());
    }

    #[test]
    fn test_from_inside_single_exit() {
        let sphere = SphereSurface::new(5.0);
        let ray = Ray::new(Point3::origin(), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let hits = intersect_sphere(&ray, &sphere);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].t - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_offset_center() {
        let sphere = SphereSurface::with_center(Point3::new(0.0, 0.0, 10.0), 2.0);
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, 1.0)).unwrap();
        let hits = intersect_sphere(&ray, &sphere);
        assert_eq!(hits.len(), 2);
        assert!((hits[0].t - 8.0).abs() < 1e-10);
        assert!((hits[1].t - 12.0).abs() < 1e-10);
    }

    #[test]
    fn test_uv_at_poles_and_equator() {
        let sphere = SphereSurface::new(10.0);

        let uv = sphere_uv(&sphere, &Point3::new(10.0, 0.0, 0.0));
        assert!(uv.x.abs() < 1e-10);
        assert!(uv.y.abs() < 1e-10);

        let uv = sphere_uv(&sphere, &Point3::new(0.0, 0.0, 10.0));
        assert!((uv.y - FRAC_PI_2).abs() < 1e-10);

        let uv = sphere_uv(&sphere, &Point3::new(0.0, 0.0, -10.0));
        assert!((uv.y + FRAC_PI_2).abs() < 1e-10);

        let uv = sphere_uv(&sphere, &Point3::new(0.0, 10.0, 0.0));
        assert!((uv.x - FRAC_PI_2).abs() < 1e-10);
    }

    #[test]
    fn test_hit_parameter_reproduces_point() {
        let sphere = SphereSurface::with_center(Point3::new(1.0, -2.0, 3.0), 4.0);
        let ray = Ray::new(Point3::new(-10.0, -2.0, 3.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
        let hits = intersect_sphere(&ray, &sphere);
        assert_eq!(hits.len(), 2);
        for hit in hits {
            use optray_geom::Surface;
            let evaluated = sphere.evaluate(hit.uv);
            assert!((evaluated - ray.at(hit.t)).norm() < 1e-9);
        }
    }
}
