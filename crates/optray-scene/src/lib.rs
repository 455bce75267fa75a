#![warn(missing_docs)]

//! Analytic scene back end for the optray tracer.
//!
//! A [`Scene`] is a collection of analytic surfaces (planes, spheres,
//! cylinders) with optional optical material assignments. It implements
//! [`SceneOracle`], so the tracer can be pointed at it directly; the
//! scene is read-only for the duration of tracing and safe to share
//! across per-ray tasks.
//!
//! # Example
//!
//! ```ignore
//! use optray_geom::{Plane, SphereSurface};
//! use optray_scene::Scene;
//! use optray_trace::{Material, TraceConfig, Tracer};
//!
//! let mut scene = Scene::new();
//! scene.add_surface(
//!     Box::new(Plane::from_normal(Point3::new(0.0, 0.0, 5.0), -Vec3::z())),
//!     Material::mirror(),
//! );
//! scene.add_surface(Box::new(SphereSurface::new(1.0)), Material::glass(1.5));
//!
//! let tracer = Tracer::new(&scene, TraceConfig::new(4))?;
//! let path = tracer.trace(Point3::new(0.0, -3.0, 0.0), Vec3::y())?;
//! ```

pub mod intersect;

use crate::intersect::intersect_surface;
use optray_geom::Surface;
use optray_math::{Dir3, Point2, Tolerance};
use optray_trace::{Material, Ray, RayHit, SceneOracle, SurfaceId};
use slotmap::SlotMap;

/// Hits closer to the ray origin than this are discarded as
/// self-intersections. Refraction children start exactly on the surface
/// they just crossed, so this zone is what lets them leave it.
pub const HIT_EXCLUSION: f64 = Tolerance::DEFAULT.linear;

/// One surface participating in a scene.
#[derive(Debug, Clone)]
struct SceneEntry {
    surface: Box<dyn Surface>,
    material: Option<Material>,
}

/// A collection of analytic surfaces with optical material assignments.
#[derive(Debug, Default)]
pub struct Scene {
    entries: SlotMap<SurfaceId, SceneEntry>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a surface with an optical material, returning its identity.
    pub fn add_surface(&mut self, surface: Box<dyn Surface>, material: Material) -> SurfaceId {
        self.entries.insert(SceneEntry {
            surface,
            material: Some(material),
        })
    }

    /// Add a surface with no optical assignment.
    ///
    /// Unassigned surfaces are still hittable; a trace branch reaching
    /// one terminates as unconfigured.
    pub fn add_unassigned(&mut self, surface: Box<dyn Surface>) -> SurfaceId {
        self.entries.insert(SceneEntry {
            surface,
            material: None,
        })
    }

    /// Replace the material of an existing surface.
    ///
    /// Returns false when the identity is not part of this scene.
    pub fn set_material(&mut self, id: SurfaceId, material: Material) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.material = Some(material);
                true
            }
            None => false,
        }
    }

    /// Borrow a surface by identity.
    pub fn surface(&self, id: SurfaceId) -> Option<&dyn Surface> {
        self.entries.get(id).map(|e| e.surface.as_ref())
    }

    /// Number of surfaces in the scene.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the scene has no surfaces.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SceneOracle for Scene {
    fn surface_count(&self) -> usize {
        self.len()
    }

    fn intersect(&self, ray: &Ray) -> Option<RayHit> {
        let mut closest: Option<RayHit> = None;
        for (id, entry) in &self.entries {
            for hit in intersect_surface(ray, entry.surface.as_ref()) {
                if hit.t <= HIT_EXCLUSION {
                    continue;
                }
                if closest.as_ref().map_or(true, |c| hit.t < c.t) {
                    closest = Some(RayHit::new(hit.t, ray.at(hit.t), id, hit.uv));
                }
            }
        }
        if let Some(hit) = &closest {
            log::trace!(
                "nearest hit t={:.6} at ({:.4}, {:.4}, {:.4})",
                hit.t,
                hit.point.x,
                hit.point.y,
                hit.point.z
            );
        }
        closest
    }

    fn material_of(&self, surface: SurfaceId) -> Option<Material> {
        self.entries.get(surface).and_then(|e| e.material)
    }

    fn normal_at(&self, surface: SurfaceId, uv: Point2) -> Option<Dir3> {
        self.entries.get(surface).and_then(|e| e.surface.normal(uv))
    }

    fn domain_of(&self, surface: SurfaceId) -> ((f64, f64), (f64, f64)) {
        self.entries
            .get(surface)
            .map(|e| e.surface.domain())
            .unwrap_or(((0.0, 1.0), (0.0, 1.0)))
    }
}
